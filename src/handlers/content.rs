// Marketing content: carousels, contact form, site services and curated
// student feedback

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    models::content::{
        ContactMessage, HomepageCarousel, HomepageCarouselUpdate, NewContactMessage,
        NewHomepageCarousel, NewSiteService, SiteService, SiteServiceUpdate,
    },
    models::review::{NewStudentFeedback, StudentFeedback, StudentFeedbackUpdate},
    utils::{validation::non_empty, ApiError, ApiResponse, PageQuery, PageSettings},
};

const CONTACT_PAGE_SIZE: i64 = 20;
const CAROUSEL_PAGE_SIZE: i64 = 10;

// ==== CAROUSELS ====

pub async fn active_carousels(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<HomepageCarousel>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let slides = HomepageCarousel::active(&mut conn).await?;
    Ok(ApiResponse::ok("Carousels fetched", slides))
}

#[derive(Debug, Serialize)]
pub struct CarouselPage {
    pub carousels: Vec<HomepageCarousel>,
    pub settings: PageSettings,
}

pub async fn admin_list_carousels(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<CarouselPage>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let (carousels, total) = HomepageCarousel::list_paginated(
        &mut conn,
        CAROUSEL_PAGE_SIZE,
        query.offset(CAROUSEL_PAGE_SIZE),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Carousels fetched",
        CarouselPage {
            carousels,
            settings: PageSettings::new(total, query.page(), CAROUSEL_PAGE_SIZE),
        },
    ))
}

pub async fn create_carousel(
    State(state): State<AppState>,
    Json(body): Json<NewHomepageCarousel>,
) -> Result<Json<ApiResponse<HomepageCarousel>>, ApiError> {
    if body.title.trim().is_empty() || body.image_url.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Title and image are required".to_string(),
        ));
    }

    let mut conn = state.db_pool.get().await?;
    let slide = HomepageCarousel::create(&mut conn, body).await?;
    Ok(ApiResponse::ok("Carousel created", slide))
}

pub async fn update_carousel(
    State(state): State<AppState>,
    Path(carousel_id): Path<uuid::Uuid>,
    Json(changes): Json<HomepageCarouselUpdate>,
) -> Result<Json<ApiResponse<HomepageCarousel>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let slide = HomepageCarousel::update(&mut conn, carousel_id, &changes)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                ApiError::NotFound("Carousel not found".to_string())
            },
            other => other.into(),
        })?;
    Ok(ApiResponse::ok("Carousel updated", slide))
}

pub async fn delete_carousel(
    State(state): State<AppState>,
    Path(carousel_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let deleted = HomepageCarousel::delete(&mut conn, carousel_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Carousel not found".to_string()));
    }
    Ok(ApiResponse::message_only("Carousel deleted"))
}

// ==== CONTACT ====

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 255, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub phone: Option<String>,
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    body.validate()?;

    let mut conn = state.db_pool.get().await?;
    ContactMessage::create(
        &mut conn,
        NewContactMessage {
            first_name: body.first_name.trim().to_string(),
            last_name: body.last_name.trim().to_string(),
            email: crate::utils::validation::normalize_email(&body.email),
            phone: non_empty(body.phone.as_deref()),
            subject: non_empty(body.subject.as_deref()),
            message: body.message.trim().to_string(),
        },
    )
    .await?;

    Ok(ApiResponse::message_only("Message received, we'll be in touch"))
}

#[derive(Debug, Serialize)]
pub struct ContactPage {
    pub messages: Vec<ContactMessage>,
    pub settings: PageSettings,
}

pub async fn list_contact_messages(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<ContactPage>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let (messages, total) = ContactMessage::list_paginated(
        &mut conn,
        CONTACT_PAGE_SIZE,
        query.offset(CONTACT_PAGE_SIZE),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Messages fetched",
        ContactPage {
            messages,
            settings: PageSettings::new(total, query.page(), CONTACT_PAGE_SIZE),
        },
    ))
}

// ==== SITE SERVICES ====

pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SiteService>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let services = SiteService::list_all(&mut conn).await?;
    Ok(ApiResponse::ok("Services fetched", services))
}

pub async fn create_service(
    State(state): State<AppState>,
    Json(body): Json<NewSiteService>,
) -> Result<Json<ApiResponse<SiteService>>, ApiError> {
    if body.title.trim().is_empty() || body.description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let mut conn = state.db_pool.get().await?;
    let service = SiteService::create(&mut conn, body).await?;
    Ok(ApiResponse::ok("Service created", service))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(service_id): Path<uuid::Uuid>,
    Json(changes): Json<SiteServiceUpdate>,
) -> Result<Json<ApiResponse<SiteService>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let service = SiteService::update(&mut conn, service_id, &changes)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                ApiError::NotFound("Service not found".to_string())
            },
            other => other.into(),
        })?;
    Ok(ApiResponse::ok("Service updated", service))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(service_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let deleted = SiteService::delete(&mut conn, service_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Service not found".to_string()));
    }
    Ok(ApiResponse::message_only("Service deleted"))
}

// ==== STUDENT FEEDBACK ====

pub async fn list_feedback(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StudentFeedback>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let feedback = StudentFeedback::list_all(&mut conn).await?;
    Ok(ApiResponse::ok("Feedback fetched", feedback))
}

pub async fn create_feedback(
    State(state): State<AppState>,
    Json(body): Json<NewStudentFeedback>,
) -> Result<Json<ApiResponse<StudentFeedback>>, ApiError> {
    if body.student_name.trim().is_empty() || body.heading.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Student name and heading are required".to_string(),
        ));
    }

    let mut conn = state.db_pool.get().await?;
    let feedback = StudentFeedback::create(&mut conn, body).await?;
    Ok(ApiResponse::ok("Feedback created", feedback))
}

pub async fn update_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<uuid::Uuid>,
    Json(changes): Json<StudentFeedbackUpdate>,
) -> Result<Json<ApiResponse<StudentFeedback>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let feedback = StudentFeedback::update(&mut conn, feedback_id, &changes)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                ApiError::NotFound("Feedback not found".to_string())
            },
            other => other.into(),
        })?;
    Ok(ApiResponse::ok("Feedback updated", feedback))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let deleted = StudentFeedback::delete(&mut conn, feedback_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Feedback not found".to_string()));
    }
    Ok(ApiResponse::message_only("Feedback deleted"))
}
