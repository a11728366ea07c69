//! Bridge server binary

use bridge_core::{Bridge, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting ChainSpan Bridge Server");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(config = %serde_json::to_string(&config)?, "Loaded configuration");

    // Open bridge
    let bridge = Bridge::open(config).await?;
    tracing::info!("Bridge opened successfully");

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down bridge server");
    bridge.shutdown().await?;
    Ok(())
}
