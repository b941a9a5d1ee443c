// Authentication middleware for protected routes
// Validates the bearer token for the expected role and injects
// AuthenticatedUser into request extensions

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    services::jwt::Role,
    utils::ApiError,
};

pub async fn require_student(
    State(app_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    authorize(app_state, Role::Student, request, next).await
}

pub async fn require_instructor(
    State(app_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    authorize(app_state, Role::Instructor, request, next).await
}

pub async fn require_admin(
    State(app_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    authorize(app_state, Role::Admin, request, next).await
}

async fn authorize(
    app_state: AppState,
    role: Role,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return ApiError::Unauthorized.into_response(),
    };

    match app_state.jwt.validate_token(role, token) {
        Ok(claims) => {
            let auth_user = AuthenticatedUser {
                id: claims.sub,
                email: claims.email,
                role: claims.role,
            };
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        },
        Err(e) => {
            tracing::warn!(expected_role = %role, "JWT validation failed: {}", e);
            ApiError::from(e).into_response()
        },
    }
}

/// Lets handlers take AuthenticatedUser directly as a parameter
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}
