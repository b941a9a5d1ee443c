pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

pub use app::{build_router, AppState};
pub use db::DieselPool;

use crate::db::{create_diesel_pool, mask_connection_string, PoolConfig};

/// Build the connection pool, run pending migrations and assemble AppState
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let pool_config = PoolConfig::default();
    tracing::info!(
        "Connecting to {}",
        mask_connection_string(&pool_config.url)
    );

    let db_pool = create_diesel_pool(pool_config).await?;

    match migrations::run_migrations().await {
        Ok(0) => tracing::info!("Database schema is up to date"),
        Ok(n) => tracing::info!("Applied {} pending migration(s)", n),
        Err(e) => return Err(format!("Migration failure: {}", e).into()),
    }

    Ok(AppState::new(db_pool))
}
