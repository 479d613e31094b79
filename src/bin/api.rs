use fpa_copilot::{
    agent::Copilot,
    api::start_server,
    config::{init_tracing, AppConfig},
    loader::load_dataset,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level);

    info!("🚀 FP&A Copilot - API Server");
    info!("📍 Port: {}", config.port);

    let dataset = load_dataset(&config.fixtures_dir)?;
    let copilot = Arc::new(Copilot::with_default_tools(dataset));

    info!("✅ Copilot initialized");
    info!("📡 Starting API server...");

    start_server(copilot, config.port).await?;

    Ok(())
}
