use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use learnify_backend_core::{
    app_config::config,
    build_router, initialize_app_state,
    services::BackgroundTaskManager,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = config();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        environment = ?config.server.environment,
        "Starting learnify-backend-core v{}",
        env!("CARGO_PKG_VERSION")
    );

    let state = match initialize_app_state().await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            return Err(e);
        },
    };

    let reminders = Arc::new(BackgroundTaskManager::new(
        state.db_pool.clone(),
        state.email.clone(),
        config.reminders.clone(),
    ));
    reminders.start();

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reminders.shutdown();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
