// Role-scoped token issuance: every role signs with its own secret, so a
// token can only ever pass validation on routes for the role it was
// issued for.

use learnify_backend_core::app_config::JwtConfig;
use learnify_backend_core::services::jwt::JwtError;
use learnify_backend_core::services::{JwtService, Role};
use uuid::Uuid;

fn test_service() -> JwtService {
    JwtService::new(JwtConfig {
        student_secret: "integration-student-secret-0123456789".to_string(),
        instructor_secret: "integration-instructor-secret-01234567".to_string(),
        admin_secret: "integration-admin-secret-0123456789-01".to_string(),
        expiry_seconds: 3600,
        issuer: "learnify-test".to_string(),
    })
}

#[test]
fn each_role_round_trips_with_its_own_secret() {
    let svc = test_service();

    for role in [Role::Student, Role::Instructor, Role::Admin] {
        let id = Uuid::new_v4();
        let token = svc.generate_token(role, id, "someone@example.com").unwrap();
        let claims = svc.validate_token(role, &token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, role);
        assert_eq!(claims.iss, "learnify-test");
        assert!(claims.exp > claims.iat);
    }
}

#[test]
fn tokens_never_cross_role_boundaries() {
    let svc = test_service();

    let student = svc
        .generate_token(Role::Student, Uuid::new_v4(), "s@example.com")
        .unwrap();
    let admin = svc
        .generate_token(Role::Admin, Uuid::new_v4(), "a@example.com")
        .unwrap();

    // Signature check fails before the role claim is even read
    assert!(matches!(
        svc.validate_token(Role::Instructor, &student),
        Err(JwtError::Invalid)
    ));
    assert!(matches!(
        svc.validate_token(Role::Student, &admin),
        Err(JwtError::Invalid)
    ));
}

#[test]
fn issuer_mismatch_is_rejected() {
    let svc = test_service();
    let other_issuer = JwtService::new(JwtConfig {
        student_secret: "integration-student-secret-0123456789".to_string(),
        instructor_secret: "integration-instructor-secret-01234567".to_string(),
        admin_secret: "integration-admin-secret-0123456789-01".to_string(),
        expiry_seconds: 3600,
        issuer: "someone-else".to_string(),
    });

    // Same secret, wrong issuer claim
    let token = other_issuer
        .generate_token(Role::Student, Uuid::new_v4(), "s@example.com")
        .unwrap();
    assert!(matches!(
        svc.validate_token(Role::Student, &token),
        Err(JwtError::Invalid)
    ));
}

#[test]
fn tampered_token_is_rejected() {
    let svc = test_service();
    let token = svc
        .generate_token(Role::Student, Uuid::new_v4(), "s@example.com")
        .unwrap();

    let mut parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3);
    let forged_sig = "AAAA".repeat(parts[2].len() / 4 + 1);
    parts[2] = &forged_sig[..parts[2].len()];
    let forged = parts.join(".");

    assert!(matches!(
        svc.validate_token(Role::Student, &forged),
        Err(JwtError::Invalid)
    ));
}
