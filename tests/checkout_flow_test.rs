// End-to-end checkout math: order amounts, callback signatures and the
// installment plan rows written after a verified EMI checkout.

use chrono::NaiveDate;
use learnify_backend_core::app_config::GatewayConfig;
use learnify_backend_core::services::emi;
use learnify_backend_core::services::payment_gateway::verify_signature_with_secret;
use learnify_backend_core::services::GatewayClient;
use ring::hmac;

fn test_gateway() -> GatewayClient {
    GatewayClient::new(GatewayConfig {
        key_id: "rzp_test_key".to_string(),
        key_secret: "rzp_test_secret".to_string(),
        api_url: "https://gateway.invalid/v1".to_string(),
    })
}

fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, format!("{}|{}", order_id, payment_id).as_bytes());
    tag.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
}

#[test]
fn client_accepts_signature_from_its_own_secret() {
    let gateway = test_gateway();
    let signature = sign("rzp_test_secret", "order_abc", "pay_xyz");

    assert!(gateway.verify_signature("order_abc", "pay_xyz", &signature));
}

#[test]
fn client_rejects_foreign_or_mangled_signatures() {
    let gateway = test_gateway();
    let signature = sign("rzp_test_secret", "order_abc", "pay_xyz");

    assert!(!gateway.verify_signature("order_other", "pay_xyz", &signature));
    assert!(!gateway.verify_signature("order_abc", "pay_other", &signature));

    let foreign = sign("some_other_secret", "order_abc", "pay_xyz");
    assert!(!gateway.verify_signature("order_abc", "pay_xyz", &foreign));

    let mut upper = signature.to_uppercase();
    upper.truncate(signature.len());
    assert!(!gateway.verify_signature("order_abc", "pay_xyz", &upper));
}

#[test]
fn free_function_matches_client_behaviour() {
    let signature = sign("s3cret", "o1", "p1");
    assert!(verify_signature_with_secret("s3cret", "o1", "p1", &signature));
    assert!(!verify_signature_with_secret("s3cret", "o1", "p2", &signature));
}

#[test]
fn emi_checkout_writes_first_installment_as_paid() {
    // 24000.00 INR over 3 installments, 30-session batch
    let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let plan = emi::build_schedule(2_400_000, 3, start, 30);

    assert_eq!(plan.len(), 3);
    assert!(plan[0].paid);
    assert!(plan.iter().skip(1).all(|row| !row.paid));
    assert!(plan.iter().all(|row| row.amount_paise == 800_000));

    // Due dates step by session_count / installments days
    assert_eq!(plan[0].due_date, start);
    assert_eq!(plan[1].due_date, NaiveDate::from_ymd_opt(2026, 9, 11).unwrap());
    assert_eq!(plan[2].due_date, NaiveDate::from_ymd_opt(2026, 9, 21).unwrap());
}

#[test]
fn full_price_charged_when_plan_has_one_installment() {
    assert_eq!(emi::installment_amount_paise(2_400_000, 1), 2_400_000);
}

#[test]
fn short_batch_still_spaces_installments_a_day_apart() {
    let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let plan = emi::build_schedule(90_000, 3, start, 2);

    assert_eq!(plan[1].due_date, NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
    assert_eq!(plan[2].due_date, NaiveDate::from_ymd_opt(2026, 9, 3).unwrap());
}
