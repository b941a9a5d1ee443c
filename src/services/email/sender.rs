// Transactional email delivery over the provider's JSON API

use super::types::{EmailError, EmailMessage, ProviderEmailPayload};
use crate::app_config::EmailConfig;
use rand::Rng;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 500;

#[derive(Clone)]
pub struct EmailSender {
    http: reqwest::Client,
    config: EmailConfig,
}

impl EmailSender {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send a single email without retries
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    pub async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if message.to.is_empty() {
            return Err(EmailError::InvalidEmail("no recipients".to_string()));
        }

        let payload = ProviderEmailPayload::from(message.clone());

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!("email sent");
            return Ok(());
        }

        if status.as_u16() == 429 {
            warn!("email provider rate limit hit");
            return Err(EmailError::RateLimitExceeded);
        }

        if status.is_server_error() {
            return Err(EmailError::ServiceUnavailable);
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), "email provider rejected message");
        Err(EmailError::SendError(format!("{}: {}", status, body)))
    }

    /// Send with exponential backoff on transient failures. Permanent
    /// rejections are not retried.
    pub async fn send_with_retry(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let mut attempt = 0;
        loop {
            match self.send(message).await {
                Ok(()) => return Ok(()),
                Err(e @ (EmailError::RateLimitExceeded | EmailError::ServiceUnavailable))
                    if attempt < MAX_RETRIES =>
                {
                    attempt += 1;
                    let backoff = BASE_BACKOFF_MS * 2u64.pow(attempt - 1);
                    let jitter = rand::thread_rng().gen_range(0..BASE_BACKOFF_MS / 2);
                    warn!(
                        attempt,
                        backoff_ms = backoff + jitter,
                        error = %e,
                        "retrying email send"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff + jitter)).await;
                },
                Err(e) => return Err(e),
            }
        }
    }
}
