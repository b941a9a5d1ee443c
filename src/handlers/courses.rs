// Course authoring (instructor) and course administration (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::{Course, Instructor},
    models::course::{CourseUpdate, NewCourse},
    utils::{validation::non_empty, ApiError, ApiResponse, PageQuery, PageSettings},
};

const ADMIN_PAGE_SIZE: i64 = 10;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LessonInput {
    #[validate(length(min = 1, message = "Lesson title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 255, message = "Course name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Slug is required"))]
    pub slug: String,

    #[validate(length(min = 1, message = "Overview is required"))]
    pub overview: String,

    #[validate(length(min = 1, message = "Level is required"))]
    pub level: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[serde(default)]
    pub sub_categories: Vec<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_paise: i64,

    #[serde(default)]
    pub is_installments: bool,

    #[serde(default)]
    pub is_upcoming: bool,

    pub start_date: Option<chrono::NaiveDate>,
    pub duration: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub total_slots: Option<i32>,

    pub long_overview: String,
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub faqs: serde_json::Value,

    #[validate(length(min = 1, message = "At least one lesson is required"))]
    pub lessons: Vec<LessonInput>,
}

pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<CreateCourseRequest>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    body.validate()?;

    let mut conn = state.db_pool.get().await?;
    let instructor = Instructor::find_by_id(&mut conn, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Instructor account not found".to_string()))?;

    if Course::find_by_slug(&mut conn, &body.slug).await?.is_some() {
        return Err(ApiError::Conflict(
            "A course with this slug already exists".to_string(),
        ));
    }

    let new_course = NewCourse {
        name: body.name.trim().to_string(),
        slug: body.slug.trim().to_lowercase(),
        overview: body.overview,
        level: body.level,
        category: body.category,
        sub_categories: json!(body.sub_categories),
        instructor_id: instructor.id,
        instructor_name: instructor.name.clone(),
        instructor_badge: None,
        price_paise: body.price_paise,
        is_installments: body.is_installments,
        is_upcoming: body.is_upcoming,
        start_date: body.start_date,
        duration: non_empty(body.duration.as_deref()),
        image_url: non_empty(body.image_url.as_deref()),
        video_url: non_empty(body.video_url.as_deref()),
        total_slots: body.total_slots,
    };

    let lessons = body
        .lessons
        .into_iter()
        .map(|l| (l.title, l.description, l.duration))
        .collect();

    let course = Course::create_with_details(
        &mut conn,
        new_course,
        body.long_overview,
        json!(body.learning_outcomes),
        json!(body.requirements),
        body.faqs,
        lessons,
    )
    .await?;

    tracing::info!(course_id = %course.id, instructor_id = %instructor.id, "course created");
    Ok(ApiResponse::ok("Course created", course))
}

pub async fn update_course(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(course_id): Path<uuid::Uuid>,
    Json(changes): Json<CourseUpdate>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let course = Course::find_by_id(&mut conn, course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    // Instructors may only edit their own courses
    if course.instructor_id != auth.id {
        return Err(ApiError::Forbidden(
            "You can only edit your own courses".to_string(),
        ));
    }

    let course = Course::update(&mut conn, course_id, &changes).await?;
    Ok(ApiResponse::ok("Course updated", course))
}

pub async fn my_courses(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let courses = Course::list_by_instructor(&mut conn, auth.id).await?;
    Ok(ApiResponse::ok("Courses fetched", courses))
}

// ==== ADMIN ====

#[derive(Debug, Serialize)]
pub struct AdminCoursePage {
    pub courses: Vec<Course>,
    pub settings: PageSettings,
}

pub async fn admin_list_courses(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<AdminCoursePage>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let (courses, total) = Course::list_paginated(
        &mut conn,
        query.search_term(),
        ADMIN_PAGE_SIZE,
        query.offset(ADMIN_PAGE_SIZE),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Courses fetched",
        AdminCoursePage {
            courses,
            settings: PageSettings::new(total, query.page(), ADMIN_PAGE_SIZE),
        },
    ))
}

fn course_in_use_body(counts: &crate::models::course::CourseReferenceCounts) -> serde_json::Value {
    json!({
        "success": false,
        "message": "Course cannot be deleted while it is referenced",
        "error_code": "COURSE_IN_USE",
        "references": counts,
    })
}

/// Delete a course along with its overview and curriculum. The reference
/// check and the deletes run in one transaction, so a payment, enrollment,
/// batch or installment row can never slip in between them; the 400 body
/// carries the counts so the admin can see what blocks it.
pub async fn delete_course(
    State(state): State<AppState>,
    Path(course_id): Path<uuid::Uuid>,
) -> Result<Response, ApiError> {
    let mut conn = state.db_pool.get().await?;

    Course::find_by_id(&mut conn, course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if let Some(counts) = Course::delete_if_unreferenced(&mut conn, course_id).await? {
        return Ok((StatusCode::BAD_REQUEST, Json(course_in_use_body(&counts))).into_response());
    }

    tracing::info!(course_id = %course_id, "course deleted");
    Ok(ApiResponse::message_only("Course deleted").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::course::CourseReferenceCounts;

    #[test]
    fn test_course_in_use_body_carries_counts() {
        let counts = CourseReferenceCounts {
            payments: 2,
            enrollments: 1,
            batches: 0,
            emis: 3,
        };
        let body = course_in_use_body(&counts);

        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "COURSE_IN_USE");
        assert_eq!(body["references"]["payments"], 2);
        assert_eq!(body["references"]["enrollments"], 1);
        assert_eq!(body["references"]["batches"], 0);
        assert_eq!(body["references"]["emis"], 3);
    }
}
