// Message builders for the transactional emails we send.
//
// Templates are inline format! strings; there are only a handful and
// they change together with the code that triggers them.

use super::types::EmailMessage;
use crate::app_config::EmailConfig;
use chrono::NaiveDate;

fn from_header(config: &EmailConfig) -> String {
    format!("{} <{}>", config.from_name, config.from_email)
}

/// Amounts are stored in paise; render as rupees with two decimals
pub fn format_inr(amount_paise: i64) -> String {
    format!("INR {}.{:02}", amount_paise / 100, (amount_paise % 100).abs())
}

pub fn otp_email(config: &EmailConfig, to: &str, name: &str, otp: &str) -> EmailMessage {
    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 520px; margin: 0 auto;">
  <h2>Password reset code</h2>
  <p>Hi {name},</p>
  <p>Use this one-time code to reset your password. It expires in 10 minutes.</p>
  <p style="font-size: 28px; letter-spacing: 6px; font-weight: bold;">{otp}</p>
  <p>If you did not request this, you can safely ignore this email.</p>
  <p>Questions? Write to <a href="mailto:{support}">{support}</a>.</p>
</div>"#,
        name = name,
        otp = otp,
        support = config.support_email,
    );
    let text = format!(
        "Hi {},\n\nYour password reset code is {}. It expires in 10 minutes.\n\n\
         If you did not request this, ignore this email.",
        name, otp
    );

    EmailMessage::new(
        from_header(config),
        vec![to.to_string()],
        "Your password reset code".to_string(),
        html,
    )
    .with_text(text)
    .with_reply_to(config.support_email.clone())
}

pub fn payment_confirmation_email(
    config: &EmailConfig,
    to: &str,
    name: &str,
    course_name: &str,
    amount_paise: i64,
    is_installment: bool,
) -> EmailMessage {
    let amount = format_inr(amount_paise);
    let plan_note = if is_installment {
        "<p>This payment covers your first installment. We'll remind you before the next one is due.</p>"
    } else {
        ""
    };
    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 520px; margin: 0 auto;">
  <h2>Payment received</h2>
  <p>Hi {name},</p>
  <p>We received your payment of <strong>{amount}</strong> for <strong>{course}</strong>. You're enrolled!</p>
  {plan_note}
  <p><a href="{frontend}/my-courses">Go to your courses</a></p>
</div>"#,
        name = name,
        amount = amount,
        course = course_name,
        plan_note = plan_note,
        frontend = config.frontend_url,
    );
    let text = format!(
        "Hi {},\n\nWe received your payment of {} for {}. You're enrolled!\n\n{}/my-courses",
        name, amount, course_name, config.frontend_url
    );

    EmailMessage::new(
        from_header(config),
        vec![to.to_string()],
        format!("Payment received for {}", course_name),
        html,
    )
    .with_text(text)
}

pub fn emi_reminder_email(
    config: &EmailConfig,
    to: &str,
    name: &str,
    course_name: &str,
    installment_number: i32,
    amount_paise: i64,
    due_date: NaiveDate,
) -> EmailMessage {
    let amount = format_inr(amount_paise);
    let due = due_date.format("%d %b %Y");
    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 520px; margin: 0 auto;">
  <h2>Installment reminder</h2>
  <p>Hi {name},</p>
  <p>Installment #{number} of <strong>{amount}</strong> for <strong>{course}</strong> is due on <strong>{due}</strong>.</p>
  <p>Paying on time keeps all your lessons unlocked.</p>
  <p><a href="{frontend}/my-courses">Pay now</a></p>
</div>"#,
        name = name,
        number = installment_number,
        amount = amount,
        course = course_name,
        due = due,
        frontend = config.frontend_url,
    );
    let text = format!(
        "Hi {},\n\nInstallment #{} of {} for {} is due on {}.\n\nPay at {}/my-courses",
        name, installment_number, amount, course_name, due, config.frontend_url
    );

    EmailMessage::new(
        from_header(config),
        vec![to.to_string()],
        format!("Installment due {} for {}", due, course_name),
        html,
    )
    .with_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            api_key: "test_key".to_string(),
            api_url: "https://api.example.com/emails".to_string(),
            from_email: "noreply@learnify.test".to_string(),
            from_name: "Learnify".to_string(),
            support_email: "support@learnify.test".to_string(),
            frontend_url: "https://learnify.test".to_string(),
        }
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(1_000_000), "INR 10000.00");
        assert_eq!(format_inr(33_333), "INR 333.33");
        assert_eq!(format_inr(5), "INR 0.05");
    }

    #[test]
    fn test_otp_email_contains_code() {
        let msg = otp_email(&test_config(), "a@b.test", "Asha", "482913");
        assert_eq!(msg.to, vec!["a@b.test"]);
        assert!(msg.html.contains("482913"));
        assert!(msg.text.as_ref().unwrap().contains("482913"));
        assert_eq!(msg.from, "Learnify <noreply@learnify.test>");
    }

    #[test]
    fn test_reminder_email_fields() {
        let due = NaiveDate::from_ymd_opt(2026, 9, 11).unwrap();
        let msg = emi_reminder_email(
            &test_config(),
            "a@b.test",
            "Asha",
            "Rust Bootcamp",
            2,
            250_000,
            due,
        );
        assert!(msg.subject.contains("11 Sep 2026"));
        assert!(msg.html.contains("INR 2500.00"));
        assert!(msg.html.contains("#2"));
    }
}
