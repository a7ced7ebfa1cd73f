use anyhow::Context;
use image_relay::config::RelayConfig;
use image_relay::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("image-relay", "info", otlp_endpoint.as_deref());

    // A missing credential stops the process before any listener is bound.
    let config = RelayConfig::load().map_err(|e| {
        tracing::error!("FATAL ERROR: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let app = Application::build(config)
        .await
        .context("Failed to build application")?;

    app.run_until_stopped().await.context("Server error")?;

    Ok(())
}
