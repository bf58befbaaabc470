use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ceramics_api::config::AppConfig;
use ceramics_api::database::connect_pool;
use ceramics_api::server;
use ceramics_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ceramics_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting ceramics API in {:?} mode", config.environment);

    let pool = connect_pool(&config.database).context("failed to set up database pool")?;
    let state = AppState::new(config, pool).context("failed to set up contact mailer")?;

    server::serve(state).await
}
