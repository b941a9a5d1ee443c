// HTTP handlers grouped by audience. Routers here carry no middleware;
// the role guards are layered on in `app` where the state lives.

pub mod admin;
pub mod auth;
pub mod batches;
pub mod blogs;
pub mod catalog;
pub mod content;
pub mod courses;
pub mod learning;
pub mod payments;

use crate::app::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

/// Routes that need no authentication
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/courses/filter", post(catalog::list_courses))
        .route("/courses/search", get(catalog::search_courses))
        .route("/courses/top", get(catalog::top_courses))
        .route("/courses/upcoming", get(catalog::upcoming_courses))
        // Detail is by slug; id-keyed course lookups get their own prefixes
        // so the two parameter styles never share a route position
        .route("/courses/{slug}", get(catalog::course_detail))
        .route("/categories", get(catalog::list_categories))
        .route("/reviews/top", get(catalog::top_reviews))
        .route("/reviews/{course_id}", get(catalog::course_reviews))
        .route("/emi-preview/{course_id}", get(payments::emi_preview))
        // Blog
        .route("/blogs", get(blogs::list_blogs))
        .route("/blogs/latest", get(blogs::latest_blogs))
        .route("/blogs/{blog_id}", get(blogs::blog_detail))
        // Marketing surfaces
        .route("/carousels", get(content::active_carousels))
        .route("/services", get(content::list_services))
        .route("/feedback", get(content::list_feedback))
        .route("/contact", post(content::submit_contact))
}

/// Login, registration and password recovery for each role
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/student/register", post(auth::register_student))
        .route("/student/login", post(auth::login_student))
        .route("/student/forgot-password", post(auth::forgot_password_student))
        .route("/student/verify-otp", post(auth::verify_otp_student))
        .route("/student/reset-password", post(auth::reset_password_student))
        .route("/instructor/register", post(auth::register_instructor))
        .route("/instructor/login", post(auth::login_instructor))
        .route(
            "/instructor/forgot-password",
            post(auth::forgot_password_instructor),
        )
        .route("/instructor/verify-otp", post(auth::verify_otp_instructor))
        .route(
            "/instructor/reset-password",
            post(auth::reset_password_instructor),
        )
        .route("/admin/login", post(auth::login_admin))
        .route("/admin/forgot-password", post(auth::forgot_password_admin))
        .route("/admin/verify-otp", post(auth::verify_otp_admin))
        .route("/admin/reset-password", post(auth::reset_password_admin))
}

/// Routes guarded by a student token
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(auth::student_profile).put(auth::update_student_profile),
        )
        .route("/payments/order", post(payments::create_order))
        .route("/payments/verify", post(payments::verify_payment))
        .route("/payments/emi/next", post(payments::pay_next_emi))
        .route("/payments/emi/verify", post(payments::verify_emi))
        .route("/payments/history", get(payments::billing_history))
        .route("/enrollments", get(payments::my_enrollments))
        .route("/courses/{course_id}/emis", get(payments::my_emis))
        .route("/courses/{course_id}/lessons", get(learning::course_lessons))
        .route("/courses/{course_id}/progress", get(learning::batch_progress))
        .route("/reviews", post(catalog::add_review))
        .route("/blogs/{blog_id}/comments", post(blogs::add_comment))
}

/// Routes guarded by an instructor token
pub fn instructor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(auth::instructor_profile).put(auth::update_instructor_profile),
        )
        .route(
            "/courses",
            get(courses::my_courses).post(courses::create_course),
        )
        .route("/courses/{course_id}", put(courses::update_course))
        .route("/courses/{course_id}/batches", get(batches::list_batches))
        .route("/batches", post(batches::create_batch))
        .route("/batches/{batch_id}", put(batches::update_batch))
        .route(
            "/batches/{batch_id}/meeting-link",
            put(batches::set_meeting_link),
        )
        .route("/batches/{batch_id}/sessions", get(batches::list_sessions))
        .route("/sessions/{session_id}/video", put(batches::set_session_video))
        .route(
            "/sessions/{session_id}/status",
            put(batches::set_session_status),
        )
}

/// Routes guarded by an admin token
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(auth::admin_profile))
        .route("/register", post(auth::register_admin))
        .route("/dashboard", get(admin::dashboard_summary))
        .route("/students", get(admin::list_students))
        .route("/instructors", get(admin::list_instructors))
        .route(
            "/instructors/{instructor_id}/status",
            put(admin::set_instructor_status),
        )
        .route("/courses", get(courses::admin_list_courses))
        .route("/courses/{course_id}", delete(courses::delete_course))
        .route("/batches/{batch_id}", delete(batches::delete_batch))
        .route("/blogs", post(blogs::create_blog))
        .route(
            "/blogs/{blog_id}",
            put(blogs::update_blog).delete(blogs::delete_blog),
        )
        .route("/carousels", get(content::admin_list_carousels).post(content::create_carousel))
        .route(
            "/carousels/{carousel_id}",
            put(content::update_carousel).delete(content::delete_carousel),
        )
        .route("/services", post(content::create_service))
        .route(
            "/services/{service_id}",
            put(content::update_service).delete(content::delete_service),
        )
        .route("/feedback", post(content::create_feedback))
        .route(
            "/feedback/{feedback_id}",
            put(content::update_feedback).delete(content::delete_feedback),
        )
        .route("/contact-messages", get(content::list_contact_messages))
}
