// Public course catalog: filtered listing, detail pages and the
// landing-page strips

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        Course, CourseBatch, CourseCategory, CourseCurriculum, CourseOverviewDetail,
        CourseReview, NewCourseReview,
    },
    models::course::CourseFilters,
    models::payment::CourseEnrollment,
    models::review::ReviewStats,
    utils::{time::ist_today, ApiError, ApiResponse, PageSettings},
};

/// Catalog pages are fixed at six cards
pub const CATALOG_PAGE_SIZE: i64 = 6;

const TOP_COURSES_LIMIT: i64 = 8;
const UPCOMING_COURSES_LIMIT: i64 = 4;
const TOP_REVIEWS_LIMIT: i64 = 6;

#[derive(Debug, Deserialize)]
pub struct CatalogRequest {
    pub page: Option<i64>,
    #[serde(flatten)]
    pub filters: CourseFilters,
}

#[derive(Debug, Serialize)]
pub struct CatalogPage {
    pub courses: Vec<Course>,
    pub settings: PageSettings,
}

/// Filtered catalog page. Filters arrive in the body so the client can
/// send arrays without query-string gymnastics.
pub async fn list_courses(
    State(state): State<AppState>,
    Json(body): Json<CatalogRequest>,
) -> Result<Json<ApiResponse<CatalogPage>>, ApiError> {
    let page = body.page.unwrap_or(1).max(1);
    let offset = (page - 1) * CATALOG_PAGE_SIZE;

    let mut conn = state.db_pool.get().await?;
    let (courses, total) =
        Course::list_filtered(&mut conn, &body.filters, CATALOG_PAGE_SIZE, offset).await?;

    Ok(ApiResponse::ok(
        "Courses fetched",
        CatalogPage {
            courses,
            settings: PageSettings::new(total, page, CATALOG_PAGE_SIZE),
        },
    ))
}

#[derive(Debug, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub overview_details: Option<CourseOverviewDetail>,
    pub curriculum: Vec<CourseCurriculum>,
    pub batches: Vec<CourseBatch>,
    pub review_stats: ReviewStats,
}

pub async fn course_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CourseDetail>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let course = Course::find_by_slug(&mut conn, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let overview_details = CourseOverviewDetail::find_by_course(&mut conn, course.id).await?;
    let curriculum = CourseCurriculum::for_course(&mut conn, course.id).await?;
    let batches = CourseBatch::list_for_course(&mut conn, course.id).await?;
    let review_stats = CourseReview::stats_for_course(&mut conn, course.id).await?;

    Ok(ApiResponse::ok(
        "Course fetched",
        CourseDetail {
            course,
            overview_details,
            curriculum,
            batches,
            review_stats,
        },
    ))
}

pub async fn top_courses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let courses = Course::top_by_enrollment(&mut conn, TOP_COURSES_LIMIT).await?;
    Ok(ApiResponse::ok("Top courses fetched", courses))
}

pub async fn upcoming_courses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let courses = Course::upcoming(&mut conn, ist_today(), UPCOMING_COURSES_LIMIT).await?;
    Ok(ApiResponse::ok("Upcoming courses fetched", courses))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CourseCategory>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let categories = CourseCategory::list_all(&mut conn).await?;
    Ok(ApiResponse::ok("Categories fetched", categories))
}

// ==== REVIEWS ====

#[derive(Debug, Serialize)]
pub struct ReviewEntry {
    #[serde(flatten)]
    pub review: CourseReview,
    pub user_name: String,
}

fn review_entries(rows: Vec<(CourseReview, String)>) -> Vec<ReviewEntry> {
    rows.into_iter()
        .map(|(review, user_name)| ReviewEntry { review, user_name })
        .collect()
}

pub async fn course_reviews(
    State(state): State<AppState>,
    Path(course_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let stats = CourseReview::stats_for_course(&mut conn, course_id).await?;
    let reviews = review_entries(CourseReview::for_course(&mut conn, course_id).await?);

    Ok(ApiResponse::ok(
        "Reviews fetched",
        json!({ "stats": stats, "reviews": reviews }),
    ))
}

pub async fn top_reviews(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ReviewEntry>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let reviews = review_entries(CourseReview::top_recent(&mut conn, TOP_REVIEWS_LIMIT).await?);
    Ok(ApiResponse::ok("Top reviews fetched", reviews))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddReviewRequest {
    pub course_id: uuid::Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 1, message = "Review text is required"))]
    pub review: String,
}

pub async fn add_review(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<AddReviewRequest>,
) -> Result<Json<ApiResponse<CourseReview>>, ApiError> {
    body.validate()?;

    let mut conn = state.db_pool.get().await?;
    Course::find_by_id(&mut conn, body.course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if !CourseEnrollment::exists_paid(&mut conn, auth.id, body.course_id).await? {
        return Err(ApiError::Forbidden(
            "Only enrolled students can review this course".to_string(),
        ));
    }

    let review = CourseReview::create(
        &mut conn,
        NewCourseReview {
            course_id: body.course_id,
            user_id: auth.id,
            rating: body.rating,
            review: body.review.trim().to_string(),
        },
    )
    .await?;

    Ok(ApiResponse::ok("Review added", review))
}

// Kept for parity with admin listings that page through courses by name
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_courses(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let term = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let (courses, _) = Course::list_paginated(&mut conn, term, 20, 0).await?;
    Ok(ApiResponse::ok("Courses fetched", courses))
}
