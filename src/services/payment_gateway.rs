// Payment gateway client (Razorpay-style order API)
//
// Orders are created server-side; the browser completes checkout and
// posts back (order_id, payment_id, signature). Nothing is recorded as
// paid until the signature verifies here.

use ring::hmac;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::app_config::GatewayConfig;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Request(String),

    #[error("Gateway returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}

/// Order as returned by the gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderPayload<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_app_config() -> Self {
        Self::new(crate::app_config::config().gateway.clone())
    }

    /// Key id is public; checkout widgets need it
    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    /// Create an order for the given amount in paise
    pub async fn create_order(
        &self,
        amount_paise: i64,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders", self.config.api_url);
        let payload = CreateOrderPayload {
            amount: amount_paise,
            currency: "INR",
            receipt,
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "gateway order creation failed");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let order: GatewayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        tracing::info!(order_id = %order.id, amount = order.amount, "gateway order created");
        Ok(order)
    }

    /// Verify the checkout callback signature:
    /// HMAC-SHA256("{order_id}|{payment_id}") keyed with the secret
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_signature_with_secret(&self.config.key_secret, order_id, payment_id, signature)
    }
}

pub fn verify_signature_with_secret(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let message = format!("{}|{}", order_id, payment_id);
    let expected = to_hex(hmac::sign(&key, message.as_bytes()).as_ref());

    expected.as_bytes().ct_eq(signature.as_bytes()).unwrap_u8() == 1
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl From<GatewayError> for crate::utils::ApiError {
    fn from(e: GatewayError) -> Self {
        crate::utils::ApiError::Gateway(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_round_trip() {
        let secret = "test_secret";
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        let signature = to_hex(hmac::sign(&key, b"order_123|pay_456").as_ref());

        assert!(verify_signature_with_secret(
            secret, "order_123", "pay_456", &signature
        ));
    }

    #[test]
    fn test_signature_rejects_tampering() {
        let secret = "test_secret";
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        let signature = to_hex(hmac::sign(&key, b"order_123|pay_456").as_ref());

        // Different payment id, wrong secret, or truncated signature
        assert!(!verify_signature_with_secret(
            secret, "order_123", "pay_999", &signature
        ));
        assert!(!verify_signature_with_secret(
            "other_secret",
            "order_123",
            "pay_456",
            &signature
        ));
        assert!(!verify_signature_with_secret(
            secret,
            "order_123",
            "pay_456",
            &signature[..32]
        ));
    }
}
