// Unified API error type and response envelope
// Every handler returns Result<_, ApiError>; the envelope is
// {"success": bool, "message": ...} with optional data

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // 410: expired OTP / reset token
    #[error("{0}")]
    Gone(String),

    #[error("{0}")]
    Validation(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Pool(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Gone(_) => "EXPIRED",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::RateLimited => "RATE_LIMITED",
            ApiError::Gateway(_) => "GATEWAY_ERROR",
            ApiError::Database(diesel::result::Error::NotFound) => "NOT_FOUND",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Pool(_) => "POOL_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to surface to clients; internals are not leaked
    fn public_message(&self) -> String {
        match self {
            ApiError::Database(diesel::result::Error::NotFound) => {
                "Resource not found".to_string()
            },
            ApiError::Database(_) | ApiError::Pool(_) | ApiError::Internal(_) => {
                "Internal server error".to_string()
            },
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }

        let body = json!({
            "success": false,
            "message": self.public_message(),
            "error_code": self.error_code(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for ApiError {
    fn from(e: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        ApiError::Pool(e.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let message = e
            .field_errors()
            .iter()
            .flat_map(|(_, errors)| errors.iter())
            .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .collect::<Vec<_>>()
            .join("; ");
        if message.is_empty() {
            ApiError::Validation("Invalid request".to_string())
        } else {
            ApiError::Validation(message)
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(e: bcrypt::BcryptError) -> Self {
        ApiError::Internal(format!("password hashing failed: {}", e))
    }
}

/// Standard success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn message_only(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Gone("expired".into()).status_code(),
            StatusCode::GONE
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Database(diesel::result::Error::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak() {
        let err = ApiError::Internal("secret detail".into());
        assert_eq!(err.public_message(), "Internal server error");
    }
}
