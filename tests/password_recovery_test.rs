// Recovery token primitives: OTP shape, reset-token hashing and the TTL
// checks used by the forgot-password flow.

use chrono::{Duration, Utc};
use learnify_backend_core::services::account_recovery::{
    generate_otp, generate_reset_token, hash_token, is_expired, token_matches,
};
use learnify_backend_core::utils::password::{hash_password_with_cost, verify_password};

#[test]
fn otp_is_always_six_digits() {
    for _ in 0..100 {
        let otp = generate_otp();
        assert_eq!(otp.len(), 6);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
        assert_ne!(otp.as_bytes()[0], b'0');
    }
}

#[test]
fn reset_token_is_hex_and_only_its_hash_is_storable() {
    let (token, stored_hash) = generate_reset_token();

    // 32 random bytes as lowercase hex
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    // The stored hash never equals the plaintext token
    assert_ne!(token, stored_hash);
    assert_eq!(hash_token(&token), stored_hash);
}

#[test]
fn token_match_is_exact() {
    let (token, hash) = generate_reset_token();
    assert!(token_matches(&token, &hash));

    // Case change, truncation or a different token must all fail
    assert!(!token_matches(&token.to_uppercase(), &hash));
    assert!(!token_matches(&token[..63], &hash));
    let (other, _) = generate_reset_token();
    assert!(!token_matches(&other, &hash));
}

#[test]
fn ttl_boundary_is_inclusive() {
    let now = Utc::now();
    let ttl = 600u64;

    // Exactly at the TTL the token is still good; a second past is not
    assert!(!is_expired(now - Duration::seconds(600), ttl, now));
    assert!(is_expired(now - Duration::seconds(601), ttl, now));
}

#[test]
fn reset_writes_a_verifiable_bcrypt_hash() {
    let hash = hash_password_with_cost("N3w-Passw0rd!", 4).unwrap();
    assert!(hash.starts_with("$2"));
    assert!(verify_password("N3w-Passw0rd!", &hash).unwrap());
    assert!(!verify_password("wrong-password", &hash).unwrap());
}
