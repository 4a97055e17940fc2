//! League Recap production service
//!
//! Main entry point: loads configuration, connects the store, and runs the
//! recap scheduler until a shutdown signal arrives.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use league_recap_service::{
    initialize_logging, setup_signal_handlers, RecapScheduler, ServiceConfig, ServiceState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env().context("Failed to load configuration")?;
    initialize_logging(&config.logging.level, &config.logging.format)?;

    info!("Starting League Recap Service v{}", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(ServiceState::new(config).await.context("Failed to initialize")?);
    info!("Service state initialized");

    let shutdown_signal = setup_signal_handlers()?;
    info!("Signal handlers configured");

    let scheduler = Arc::new(RecapScheduler::new(state));
    let scheduler_handle = tokio::spawn(async move {
        if let Err(e) = scheduler.start().await {
            tracing::error!("Scheduler failed: {e}");
        }
    });

    info!("League Recap Service is running. Press Ctrl+C to shutdown gracefully.");
    let _ = shutdown_signal.await;

    info!("Shutdown signal received. Stopping scheduler...");
    scheduler_handle.abort();
    match timeout(Duration::from_secs(10), scheduler_handle).await {
        Ok(_) => info!("Scheduler stopped"),
        Err(_) => warn!("Scheduler did not stop within timeout"),
    }

    info!("League Recap Service shutdown complete");
    Ok(())
}
