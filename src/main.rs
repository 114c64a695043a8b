//! task-drafter - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the draft-generation endpoint.

use task_drafter::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_drafter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: generator={}, model={}",
        config.generator, config.model
    );

    api::serve(config).await?;

    Ok(())
}
