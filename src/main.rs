// src/main.rs

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxcal::VoxcalApp;
use voxcal_config::{ConfigManager, VoxcalConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = load_config()?;

    // Initialize logging
    init_logging(&config.observability.log_filter)?;

    info!(
        "Starting voxcal assistant v{} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP")
    );

    let mut app = VoxcalApp::new(config)?;
    app.run().await?;

    info!("voxcal shut down successfully");
    Ok(())
}

fn init_logging(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// First CLI argument, then `VOXCAL_CONFIG`, then defaults with env overrides.
fn load_config() -> Result<VoxcalConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VOXCAL_CONFIG").ok());

    let manager = match path {
        Some(path) => ConfigManager::new(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => ConfigManager::from_env().context("Invalid configuration in environment")?,
    };

    Ok(manager.get())
}
