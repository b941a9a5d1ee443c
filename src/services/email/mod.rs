// Outbound email: builders compose the messages, the sender delivers
// them over the provider API with retries.

mod builders;
mod sender;
mod types;

pub use builders::format_inr;
pub use types::{EmailError, EmailMessage};

use crate::app_config::EmailConfig;
use chrono::NaiveDate;
use sender::EmailSender;

#[derive(Clone)]
pub struct EmailService {
    sender: EmailSender,
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            sender: EmailSender::new(config.clone()),
            config,
        }
    }

    pub fn from_app_config() -> Self {
        Self::new(crate::app_config::config().email.clone())
    }

    pub async fn send_otp(&self, to: &str, name: &str, otp: &str) -> Result<(), EmailError> {
        let message = builders::otp_email(&self.config, to, name, otp);
        self.sender.send_with_retry(&message).await
    }

    pub async fn send_payment_confirmation(
        &self,
        to: &str,
        name: &str,
        course_name: &str,
        amount_paise: i64,
        is_installment: bool,
    ) -> Result<(), EmailError> {
        let message = builders::payment_confirmation_email(
            &self.config,
            to,
            name,
            course_name,
            amount_paise,
            is_installment,
        );
        self.sender.send_with_retry(&message).await
    }

    pub async fn send_emi_reminder(
        &self,
        to: &str,
        name: &str,
        course_name: &str,
        installment_number: i32,
        amount_paise: i64,
        due_date: NaiveDate,
    ) -> Result<(), EmailError> {
        let message = builders::emi_reminder_email(
            &self.config,
            to,
            name,
            course_name,
            installment_number,
            amount_paise,
            due_date,
        );
        self.sender.send_with_retry(&message).await
    }
}
