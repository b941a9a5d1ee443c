// Diesel migration runner for PostgreSQL
// diesel_migrations requires sync connections, so this runs in spawn_blocking

use crate::db::MIGRATIONS;
use diesel::Connection;
use diesel::PgConnection;
use diesel_migrations::MigrationHarness;
use std::error::Error;
use tracing::{debug, info};

/// Run all pending Diesel migrations, returning how many were applied
pub async fn run_migrations() -> Result<usize, Box<dyn Error + Send + Sync>> {
    let database_url = crate::app_config::config().database_url.clone();

    let applied_migrations =
        tokio::task::spawn_blocking(move || -> Result<usize, Box<dyn Error + Send + Sync>> {
            let mut conn = PgConnection::establish(&database_url)
                .map_err(|e| format!("Failed to establish sync connection: {}", e))?;

            let pending_migrations = conn
                .pending_migrations(MIGRATIONS)
                .map_err(|e| format!("Failed to check pending migrations: {}", e))?;

            if pending_migrations.is_empty() {
                debug!("No pending migrations found");
                return Ok(0);
            }

            info!("Found {} pending migrations", pending_migrations.len());

            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| format!("Failed to run migrations: {}", e))?;

            for migration in &applied {
                debug!("Applied migration: {}", migration);
            }

            Ok(applied.len())
        })
        .await
        .map_err(|e| format!("Migration task panicked: {}", e))??;

    info!("Applied {} migrations", applied_migrations);
    Ok(applied_migrations)
}

/// Check migration status without applying anything
pub async fn check_migration_status() -> Result<MigrationStatus, Box<dyn Error + Send + Sync>> {
    let database_url = crate::app_config::config().database_url.clone();

    let status = tokio::task::spawn_blocking(
        move || -> Result<MigrationStatus, Box<dyn Error + Send + Sync>> {
            let mut conn = PgConnection::establish(&database_url)
                .map_err(|e| format!("Failed to establish sync connection: {}", e))?;

            let applied = conn
                .applied_migrations()
                .map_err(|e| format!("Failed to get applied migrations: {}", e))?;

            let pending = conn
                .pending_migrations(MIGRATIONS)
                .map_err(|e| format!("Failed to get pending migrations: {}", e))?;

            Ok(MigrationStatus {
                applied_count: applied.len(),
                pending_count: pending.len(),
            })
        },
    )
    .await
    .map_err(|e| format!("Status check task panicked: {}", e))??;

    Ok(status)
}

/// Migration status information
#[derive(Debug)]
pub struct MigrationStatus {
    pub applied_count: usize,
    pub pending_count: usize,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.pending_count == 0
    }
}
