// Application state and router assembly

use std::sync::Arc;

use axum::{extract::State, middleware, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::{
    db::{check_pool_health, DieselPool},
    handlers,
    middleware::{
        dynamic_cors_middleware, rate_limit_middleware, require_admin, require_instructor,
        require_student,
    },
    services::{EmailService, GatewayClient, JwtService, RecoveryService},
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DieselPool,
    pub jwt: JwtService,
    pub email: Arc<EmailService>,
    pub gateway: Arc<GatewayClient>,
    pub recovery: RecoveryService,
}

impl AppState {
    pub fn new(db_pool: DieselPool) -> Self {
        let email = Arc::new(EmailService::from_app_config());
        Self {
            jwt: JwtService::from_app_config(),
            gateway: Arc::new(GatewayClient::from_app_config()),
            recovery: RecoveryService::new(db_pool.clone(), email.clone()),
            email,
            db_pool,
        }
    }
}

/// Build the full application router with role guards and shared layers
pub fn build_router(state: AppState) -> Router {
    let student = handlers::student_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_student,
    ));
    let instructor = handlers::instructor_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_instructor,
    ));
    let admin = handlers::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_admin,
    ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", handlers::public_routes())
        .nest("/api/auth", handlers::auth_routes())
        .nest("/api/student", student)
        .nest("/api/instructor", instructor)
        .nest("/api/admin", admin)
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(middleware::from_fn(dynamic_cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe; verifies a database connection can be checked out
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match check_pool_health(&state.db_pool).await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            "unhealthy"
        },
    };

    Json(serde_json::json!({
        "status": if database == "healthy" { "ok" } else { "degraded" },
        "database": database,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
