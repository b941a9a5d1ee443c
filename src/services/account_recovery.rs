// Password recovery: emailed 6-digit OTP, then a one-shot reset token
//
// Flow per role: forgot_password stores an OTP (10 min TTL) and emails it;
// verify_otp swaps a correct OTP for a 32-byte reset token (15 min TTL),
// of which only the SHA-256 hash is stored; reset_password checks the
// token in constant time and writes the new bcrypt hash.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use std::time::Duration;
use subtle::ConstantTimeEq;

use crate::db::DieselPool;
use crate::models::{Admin, Instructor, RecoveryRecord, User};
use crate::services::email::EmailService;
use crate::services::jwt::Role;
use crate::utils::ApiError;
use chrono::{DateTime, Utc};
use diesel_async::AsyncPgConnection;
use std::sync::Arc;

const RESET_TOKEN_BYTES: usize = 32;

#[derive(Clone)]
pub struct RecoveryService {
    pool: DieselPool,
    email: Arc<EmailService>,
}

impl RecoveryService {
    pub fn new(pool: DieselPool, email: Arc<EmailService>) -> Self {
        Self { pool, email }
    }

    /// Generate and email an OTP for the account
    pub async fn forgot_password(&self, role: Role, email: &str) -> Result<(), ApiError> {
        let mut conn = self.pool.get().await?;

        let Some(record) = fetch_recovery(&mut conn, role, email).await? else {
            // Keep response timing roughly flat for unknown emails
            let jitter = rand::thread_rng().gen_range(80..150);
            tokio::time::sleep(Duration::from_millis(jitter)).await;
            return Err(ApiError::NotFound(
                "No account found with this email".to_string(),
            ));
        };

        let otp = generate_otp();
        set_otp(&mut conn, role, email, &otp).await?;

        self.email
            .send_otp(&record.email, &record.name, &otp)
            .await
            .map_err(|e| ApiError::Internal(format!("failed to send OTP email: {}", e)))?;

        tracing::info!(role = %role, "password recovery OTP issued");
        Ok(())
    }

    /// Exchange a valid OTP for a reset token. The plaintext token goes
    /// back to the caller; only its hash is stored.
    pub async fn verify_otp(&self, role: Role, email: &str, otp: &str) -> Result<String, ApiError> {
        let mut conn = self.pool.get().await?;

        let record = fetch_recovery(&mut conn, role, email)
            .await?
            .ok_or_else(|| ApiError::NotFound("No account found with this email".to_string()))?;

        let (stored_otp, issued_at) = match (&record.otp, record.otp_created_at) {
            (Some(o), Some(t)) => (o, t),
            _ => return Err(ApiError::BadRequest("No OTP was requested".to_string())),
        };

        if stored_otp.as_bytes().ct_eq(otp.as_bytes()).unwrap_u8() != 1 {
            return Err(ApiError::BadRequest("Invalid OTP".to_string()));
        }

        let ttl = crate::app_config::config().security.otp_ttl_seconds;
        if is_expired(issued_at, ttl, Utc::now()) {
            return Err(ApiError::Gone(
                "OTP has expired, please request a new one".to_string(),
            ));
        }

        let (token, token_hash) = generate_reset_token();
        swap_otp_for_reset_token(&mut conn, role, email, &token_hash).await?;

        Ok(token)
    }

    /// Validate the reset token and set the new password
    pub async fn reset_password(
        &self,
        role: Role,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let mut conn = self.pool.get().await?;

        let record = fetch_recovery(&mut conn, role, email)
            .await?
            .ok_or_else(|| ApiError::NotFound("No account found with this email".to_string()))?;

        let (stored_hash, issued_at) =
            match (&record.reset_token_hash, record.reset_token_created_at) {
                (Some(h), Some(t)) => (h, t),
                _ => {
                    return Err(ApiError::BadRequest(
                        "No password reset was requested".to_string(),
                    ))
                },
            };

        if !token_matches(token, stored_hash) {
            return Err(ApiError::BadRequest("Invalid reset token".to_string()));
        }

        let ttl = crate::app_config::config().security.reset_token_ttl_seconds;
        if is_expired(issued_at, ttl, Utc::now()) {
            return Err(ApiError::Gone(
                "Reset token has expired, please start over".to_string(),
            ));
        }

        let password_hash = crate::utils::password::hash_password(new_password)?;
        complete_password_reset(&mut conn, role, email, &password_hash).await?;

        tracing::info!(role = %role, "password reset completed");
        Ok(())
    }
}

// ==== ROLE DISPATCH ====
// The three principal tables expose identical recovery queries; these
// helpers pick the right one.

async fn fetch_recovery(
    conn: &mut AsyncPgConnection,
    role: Role,
    email: &str,
) -> Result<Option<RecoveryRecord>, diesel::result::Error> {
    match role {
        Role::Student => User::fetch_recovery(conn, email).await,
        Role::Instructor => Instructor::fetch_recovery(conn, email).await,
        Role::Admin => Admin::fetch_recovery(conn, email).await,
    }
}

async fn set_otp(
    conn: &mut AsyncPgConnection,
    role: Role,
    email: &str,
    otp: &str,
) -> Result<usize, diesel::result::Error> {
    match role {
        Role::Student => User::set_otp(conn, email, otp).await,
        Role::Instructor => Instructor::set_otp(conn, email, otp).await,
        Role::Admin => Admin::set_otp(conn, email, otp).await,
    }
}

async fn swap_otp_for_reset_token(
    conn: &mut AsyncPgConnection,
    role: Role,
    email: &str,
    token_hash: &str,
) -> Result<usize, diesel::result::Error> {
    match role {
        Role::Student => User::swap_otp_for_reset_token(conn, email, token_hash).await,
        Role::Instructor => Instructor::swap_otp_for_reset_token(conn, email, token_hash).await,
        Role::Admin => Admin::swap_otp_for_reset_token(conn, email, token_hash).await,
    }
}

async fn complete_password_reset(
    conn: &mut AsyncPgConnection,
    role: Role,
    email: &str,
    password_hash: &str,
) -> Result<usize, diesel::result::Error> {
    match role {
        Role::Student => User::complete_password_reset(conn, email, password_hash).await,
        Role::Instructor => Instructor::complete_password_reset(conn, email, password_hash).await,
        Role::Admin => Admin::complete_password_reset(conn, email, password_hash).await,
    }
}

// ==== TOKEN PRIMITIVES ====

/// Six digits, never with a leading zero
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Random reset token (hex) plus the SHA-256 hash that gets stored
pub fn generate_reset_token() -> (String, String) {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let token = to_hex(&bytes);
    let hash = hash_token(&token);
    (token, hash)
}

pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    to_hex(&digest)
}

/// Constant-time comparison of a presented token against the stored hash
pub fn token_matches(token: &str, stored_hash: &str) -> bool {
    let presented = hash_token(token);
    presented.as_bytes().ct_eq(stored_hash.as_bytes()).unwrap_u8() == 1
}

pub fn is_expired(issued_at: DateTime<Utc>, ttl_seconds: u64, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(issued_at).num_seconds() > ttl_seconds as i64
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_otp_shape() {
        for _ in 0..50 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            let n: u32 = otp.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_reset_token_shape_and_hash() {
        let (token, hash) = generate_reset_token();
        assert_eq!(token.len(), RESET_TOKEN_BYTES * 2);
        assert_eq!(hash.len(), 64);
        assert!(token_matches(&token, &hash));
        assert!(!token_matches("deadbeef", &hash));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (t1, _) = generate_reset_token();
        let (t2, _) = generate_reset_token();
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_expiry_boundaries() {
        let now = Utc::now();
        let nine_minutes = now - ChronoDuration::minutes(9);
        let eleven_minutes = now - ChronoDuration::minutes(11);

        assert!(!is_expired(nine_minutes, 600, now));
        assert!(is_expired(eleven_minutes, 600, now));
    }
}
