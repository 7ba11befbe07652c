use tracing_subscriber::EnvFilter;

use training_paths_api::{app, config, is_development};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, DATABASE_BACKEND, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("training_paths_api=info,tower_http=info")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Training Paths API in {:?} mode", config.environment);
    if is_development!() {
        tracing::debug!("Effective configuration: {:?}", config);
    }

    app::serve(config).await
}
