// Periodic background work, currently just the EMI due-date reminders.
//
// One pass runs on startup and then on a fixed interval. Failures on a
// single row are logged and skipped so one bad address never stalls the
// rest of the batch.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::app_config::ReminderConfig;
use crate::db::DieselPool;
use crate::models::CourseEmi;
use crate::services::email::EmailService;
use crate::utils::time::ist_today;

pub struct BackgroundTaskManager {
    pool: DieselPool,
    email: Arc<EmailService>,
    config: ReminderConfig,
    shutdown_tx: watch::Sender<bool>,
}

impl BackgroundTaskManager {
    pub fn new(pool: DieselPool, email: Arc<EmailService>, config: ReminderConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            pool,
            email,
            config,
            shutdown_tx,
        }
    }

    /// Spawn the reminder loop. Returns immediately; the loop stops when
    /// `shutdown` is called.
    pub fn start(&self) {
        let pool = self.pool.clone();
        let email = self.email.clone();
        let config = self.config.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(config.interval_seconds));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                interval_seconds = config.interval_seconds,
                due_window_days = config.due_window_days,
                "EMI reminder task started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = run_reminder_pass(&pool, &email, config.due_window_days).await {
                            error!(error = %e, "EMI reminder pass failed");
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("EMI reminder task stopping");
                            break;
                        }
                    }
                }
            }
        });
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Email every unpaid installment due between today and today plus the
/// configured window (inclusive).
pub async fn run_reminder_pass(
    pool: &DieselPool,
    email: &EmailService,
    due_window_days: i64,
) -> Result<(), crate::utils::ApiError> {
    let mut conn = pool.get().await?;

    let today = ist_today();
    let until = today + chrono::Duration::days(due_window_days);
    let due = CourseEmi::due_between(&mut conn, today, until).await?;
    drop(conn);

    if due.is_empty() {
        info!("no installments due in reminder window");
        return Ok(());
    }

    info!(count = due.len(), "sending EMI reminders");

    let mut sent = 0usize;
    for row in &due {
        match email
            .send_emi_reminder(
                &row.user_email,
                &row.user_name,
                &row.course_name,
                row.installment_number,
                row.amount_paise,
                row.due_date,
            )
            .await
        {
            Ok(()) => sent += 1,
            Err(e) => {
                warn!(emi_id = %row.emi_id, error = %e, "failed to send EMI reminder");
            },
        }
    }

    info!(sent, total = due.len(), "EMI reminder pass finished");
    Ok(())
}
