// Batch management: creation auto-generates one visible session per
// lesson, deletion is blocked once anyone has paid into the batch.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    app::AppState,
    models::batch::{
        BatchSession, CourseBatch, CourseBatchUpdate, NewCourseBatch, SESSION_STATUS_HIDE,
        SESSION_STATUS_SHOW,
    },
    models::{Course, CourseCurriculum},
    utils::{ApiError, ApiResponse},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBatchRequest {
    pub course_id: uuid::Uuid,

    #[validate(length(min = 1, max = 255, message = "Batch name is required"))]
    pub batch_name: String,

    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub meeting_link: Option<String>,
}

pub async fn create_batch(
    State(state): State<AppState>,
    Json(body): Json<CreateBatchRequest>,
) -> Result<Json<ApiResponse<CourseBatch>>, ApiError> {
    body.validate()?;

    if body.end_date < body.start_date {
        return Err(ApiError::BadRequest(
            "Batch end date cannot be before its start date".to_string(),
        ));
    }

    let mut conn = state.db_pool.get().await?;
    let course = Course::find_by_id(&mut conn, body.course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let lesson_count = CourseCurriculum::count_for_course(&mut conn, course.id).await?;
    if lesson_count == 0 {
        return Err(ApiError::BadRequest(
            "Course has no curriculum; add lessons before creating a batch".to_string(),
        ));
    }

    let batch_number = CourseBatch::next_batch_number(&mut conn, course.id).await?;
    let batch = CourseBatch::create_with_sessions(
        &mut conn,
        NewCourseBatch {
            course_id: course.id,
            instructor_id: course.instructor_id,
            batch_number,
            batch_name: body.batch_name.trim().to_string(),
            start_date: body.start_date,
            end_date: body.end_date,
            start_time: body.start_time,
            end_time: body.end_time,
            meeting_link: body.meeting_link,
            status: "active".to_string(),
        },
        lesson_count as i32,
    )
    .await?;

    tracing::info!(batch_id = %batch.id, course_id = %course.id, batch_number, "batch created");
    Ok(ApiResponse::ok("Batch created", batch))
}

pub async fn list_batches(
    State(state): State<AppState>,
    Path(course_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<Vec<CourseBatch>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let batches = CourseBatch::list_for_course(&mut conn, course_id).await?;
    Ok(ApiResponse::ok("Batches fetched", batches))
}

pub async fn update_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<uuid::Uuid>,
    Json(changes): Json<CourseBatchUpdate>,
) -> Result<Json<ApiResponse<CourseBatch>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    CourseBatch::find_by_id(&mut conn, batch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;

    let batch = CourseBatch::update(&mut conn, batch_id, &changes).await?;
    Ok(ApiResponse::ok("Batch updated", batch))
}

#[derive(Debug, Deserialize, Validate)]
pub struct MeetingLinkRequest {
    #[validate(url(message = "Meeting link must be a valid URL"))]
    pub meeting_link: String,
}

pub async fn set_meeting_link(
    State(state): State<AppState>,
    Path(batch_id): Path<uuid::Uuid>,
    Json(body): Json<MeetingLinkRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    body.validate()?;

    let mut conn = state.db_pool.get().await?;
    let updated = CourseBatch::set_meeting_link(&mut conn, batch_id, &body.meeting_link).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("Batch not found".to_string()));
    }
    Ok(ApiResponse::message_only("Meeting link updated"))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Path(batch_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<Vec<BatchSession>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let sessions = BatchSession::for_batch(&mut conn, batch_id).await?;
    Ok(ApiResponse::ok("Sessions fetched", sessions))
}

#[derive(Debug, Deserialize, Validate)]
pub struct VideoLinkRequest {
    #[validate(url(message = "Video link must be a valid URL"))]
    pub video_link: String,
}

pub async fn set_session_video(
    State(state): State<AppState>,
    Path(session_id): Path<uuid::Uuid>,
    Json(body): Json<VideoLinkRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    body.validate()?;

    let mut conn = state.db_pool.get().await?;
    let updated = BatchSession::set_video_link(&mut conn, session_id, &body.video_link).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("Session not found".to_string()));
    }
    Ok(ApiResponse::message_only("Recording link updated"))
}

#[derive(Debug, Deserialize)]
pub struct SessionStatusRequest {
    pub status: String,
}

/// Flip a session between `show` and `hide`
pub async fn set_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<uuid::Uuid>,
    Json(body): Json<SessionStatusRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if body.status != SESSION_STATUS_SHOW && body.status != SESSION_STATUS_HIDE {
        return Err(ApiError::BadRequest(
            "Session status must be 'show' or 'hide'".to_string(),
        ));
    }

    let mut conn = state.db_pool.get().await?;
    let updated = BatchSession::set_status(&mut conn, session_id, &body.status).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("Session not found".to_string()));
    }
    Ok(ApiResponse::message_only("Session status updated"))
}

/// Delete a batch and its sessions. Refused while any enrollment, payment
/// or installment row references the batch, paid or not; the check and
/// the deletes share one transaction.
pub async fn delete_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    CourseBatch::find_by_id(&mut conn, batch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;

    if CourseBatch::delete_if_unreferenced(&mut conn, batch_id)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest(
            "Batch cannot be deleted while enrollments or payments reference it".to_string(),
        ));
    }

    tracing::info!(batch_id = %batch_id, "batch deleted");
    Ok(ApiResponse::message_only("Batch deleted"))
}
