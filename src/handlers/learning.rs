// The student's view of an enrolled course: lesson list with installment
// gating, live-session windows and batch progress.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::batch::{BatchSession, CourseBatch, SESSION_STATUS_SHOW},
    models::payment::{CourseEmi, CourseEnrollment, PaymentMethod},
    models::{Course, CourseCurriculum},
    services::emi::{self, BatchProgress, MeetingStatus},
    utils::{time::ist_now, ApiError, ApiResponse},
};

#[derive(Debug, Serialize)]
pub struct LessonView {
    pub sequence: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub lesson_date: chrono::NaiveDate,
    pub locked: bool,
    pub hidden: bool,
    pub meeting_status: Option<&'static str>,
    pub meeting_link: Option<String>,
    pub video_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseLessonsResponse {
    pub course_id: Uuid,
    pub course_name: String,
    pub batch_id: Uuid,
    pub batch_name: String,
    pub fully_paid: bool,
    pub unlocked_lessons: i64,
    pub lessons: Vec<LessonView>,
}

struct PlanState {
    fully_paid: bool,
    unlocked: i64,
}

async fn plan_state(
    conn: &mut diesel_async::AsyncPgConnection,
    enrollment: &CourseEnrollment,
    total_lessons: i64,
) -> Result<PlanState, ApiError> {
    let method = PaymentMethod::from_str(&enrollment.payment_method)
        .ok_or_else(|| ApiError::Internal("unknown payment method on enrollment".to_string()))?;

    if !method.is_emi() {
        return Ok(PlanState {
            fully_paid: true,
            unlocked: total_lessons,
        });
    }

    let (paid, total) =
        CourseEmi::count_paid_for_plan(conn, enrollment.user_id, enrollment.course_id).await?;
    Ok(PlanState {
        fully_paid: paid == total,
        unlocked: emi::unlocked_lessons(total_lessons, total, paid),
    })
}

/// Lesson list for an enrolled student. Lessons past the unlocked window
/// come back locked with no links; hidden sessions expose neither links
/// nor a meeting status.
pub async fn course_lessons(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CourseLessonsResponse>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let enrollment = CourseEnrollment::latest_for_user_course(&mut conn, auth.id, course_id)
        .await?
        .ok_or_else(|| {
            ApiError::Forbidden("You are not enrolled in this course".to_string())
        })?;

    let course = Course::find_by_id(&mut conn, course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;
    let batch = CourseBatch::find_by_id(&mut conn, enrollment.batch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;

    let curriculum = CourseCurriculum::for_course(&mut conn, course_id).await?;
    let sessions: HashMap<i32, BatchSession> = BatchSession::for_batch(&mut conn, batch.id)
        .await?
        .into_iter()
        .map(|s| (s.session_number, s))
        .collect();

    let plan = plan_state(&mut conn, &enrollment, curriculum.len() as i64).await?;
    let now = ist_now();

    let lessons = curriculum
        .into_iter()
        .map(|lesson| {
            let locked = emi::is_lesson_locked(lesson.sequence, plan.fully_paid, plan.unlocked);
            let lesson_date = emi::lesson_date(batch.start_date, lesson.sequence);
            let session = sessions.get(&lesson.sequence);
            let hidden = session.is_some_and(|s| s.status != SESSION_STATUS_SHOW);

            let mut view = LessonView {
                sequence: lesson.sequence,
                title: lesson.title,
                description: lesson.description,
                duration: lesson.duration,
                lesson_date,
                locked,
                hidden,
                meeting_status: None,
                meeting_link: None,
                video_link: None,
            };

            if locked || hidden {
                return view;
            }

            let status = emi::meeting_status(now, lesson_date, batch.start_time, batch.end_time);
            view.meeting_status = Some(status.as_str());

            // A recording always wins; the live link is only exposed
            // while the join window is open
            let video = session.and_then(|s| s.video_link.clone());
            if video.is_some() {
                view.video_link = video;
            } else if status == MeetingStatus::Join {
                view.meeting_link = batch.meeting_link.clone();
            }

            view
        })
        .collect();

    Ok(ApiResponse::ok(
        "Lessons fetched",
        CourseLessonsResponse {
            course_id,
            course_name: course.name,
            batch_id: batch.id,
            batch_name: batch.batch_name,
            fully_paid: plan.fully_paid,
            unlocked_lessons: plan.unlocked,
            lessons,
        },
    ))
}

/// Day-level progress through the student's batch
pub async fn batch_progress(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BatchProgress>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let enrollment = CourseEnrollment::latest_for_user_course(&mut conn, auth.id, course_id)
        .await?
        .ok_or_else(|| {
            ApiError::Forbidden("You are not enrolled in this course".to_string())
        })?;

    let batch = CourseBatch::find_by_id(&mut conn, enrollment.batch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;
    let total_lessons = CourseCurriculum::count_for_course(&mut conn, course_id).await?;

    let progress = emi::batch_progress(
        ist_now(),
        batch.start_date,
        batch.end_date,
        batch.end_time,
        total_lessons,
    );
    Ok(ApiResponse::ok("Progress fetched", progress))
}
