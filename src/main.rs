use tracing_subscriber::EnvFilter;

use legisdiff::api::server;
use legisdiff::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        model = %config.openai_model,
        addr = %config.bind_addr,
        "Starting LegisDiff"
    );

    server::run(config).await
}
