// Password hashing and verification using bcrypt

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingError(String),

    #[error("Failed to verify password: {0}")]
    VerificationError(String),
}

/// Hash a password with the configured bcrypt cost
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let cost = crate::app_config::config().security.bcrypt_cost;
    hash_password_with_cost(password, cost)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(password, cost).map_err(|e| PasswordError::HashingError(e.to_string()))
}

/// Verify a password against a stored bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|e| PasswordError::VerificationError(e.to_string()))
}

impl From<PasswordError> for crate::utils::error::ApiError {
    fn from(e: PasswordError) -> Self {
        crate::utils::error::ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with_cost("S3curePass!", TEST_COST).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("S3curePass!", &hash).unwrap());
        assert!(!verify_password("WrongPass", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_hashes() {
        let h1 = hash_password_with_cost("repeatable", TEST_COST).unwrap();
        let h2 = hash_password_with_cost("repeatable", TEST_COST).unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password("repeatable", &h1).unwrap());
        assert!(verify_password("repeatable", &h2).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash_is_error() {
        assert!(verify_password("whatever", "not-a-hash").is_err());
    }
}
