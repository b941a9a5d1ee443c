// Shared types for the email module

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Failed to send email: {0}")]
    SendError(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Generic email message structure that can be sent
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
    pub reply_to: Option<String>,
}

impl EmailMessage {
    pub fn new(from: String, to: Vec<String>, subject: String, html: String) -> Self {
        Self {
            from,
            to,
            subject,
            html,
            text: None,
            reply_to: None,
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }
}

/// Provider API payload. Optional fields are omitted from the JSON when
/// `None` instead of being sent as null.
#[derive(Debug, Serialize)]
pub struct ProviderEmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl From<EmailMessage> for ProviderEmailPayload {
    fn from(message: EmailMessage) -> Self {
        Self {
            from: message.from,
            to: message.to,
            subject: message.subject,
            html: message.html,
            text: message.text,
            reply_to: message.reply_to,
        }
    }
}
