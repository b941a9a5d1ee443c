// Role-scoped JWT issuance and validation
// Each principal role signs with its own secret, so a student token can
// never pass validation on an instructor or admin route

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::app_config::JwtConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid")]
    Invalid,

    #[error("Token role does not match this endpoint")]
    RoleMismatch,
}

#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn from_app_config() -> Self {
        Self::new(crate::app_config::config().jwt.clone())
    }

    fn secret_for(&self, role: Role) -> &[u8] {
        match role {
            Role::Student => self.config.student_secret.as_bytes(),
            Role::Instructor => self.config.instructor_secret.as_bytes(),
            Role::Admin => self.config.admin_secret.as_bytes(),
        }
    }

    /// Issue a token for an account in the given role
    pub fn generate_token(&self, role: Role, id: Uuid, email: &str) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: id,
            email: email.to_string(),
            role,
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.expiry_seconds as i64,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_for(role)),
        )
        .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Validate a token against the secret for the expected role
    pub fn validate_token(&self, role: Role, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_for(role)),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid,
        })?;

        // Defense in depth: the role claim must match the secret that
        // verified the signature
        if data.claims.role != role {
            return Err(JwtError::RoleMismatch);
        }

        Ok(data.claims)
    }
}

impl From<JwtError> for crate::utils::ApiError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::RoleMismatch => {
                crate::utils::ApiError::Forbidden("Insufficient permissions".to_string())
            },
            JwtError::Encoding(msg) => crate::utils::ApiError::Internal(msg),
            _ => crate::utils::ApiError::Unauthorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            student_secret: "student-secret-0123456789-0123456789-xx".to_string(),
            instructor_secret: "instructor-secret-0123456789-012345-xx".to_string(),
            admin_secret: "admin-secret-0123456789-0123456789-0-xx".to_string(),
            expiry_seconds: 3600,
            issuer: "learnify-test".to_string(),
        })
    }

    #[test]
    fn test_round_trip() {
        let svc = test_service();
        let id = Uuid::new_v4();
        let token = svc
            .generate_token(Role::Student, id, "student@example.com")
            .unwrap();

        let claims = svc.validate_token(Role::Student, &token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "student@example.com");
        assert_eq!(claims.role, Role::Student);
    }

    #[test]
    fn test_cross_role_rejected() {
        let svc = test_service();
        let token = svc
            .generate_token(Role::Student, Uuid::new_v4(), "s@example.com")
            .unwrap();

        // A student token must not validate with the admin secret
        assert!(matches!(
            svc.validate_token(Role::Admin, &token),
            Err(JwtError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = test_service();
        assert!(matches!(
            svc.validate_token(Role::Student, "not.a.jwt"),
            Err(JwtError::Invalid)
        ));
    }
}
