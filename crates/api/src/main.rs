//! Matchday server entry point

use anyhow::Context;
use matchday_api::{router, AppContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the variables directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = matchday_infra::config::load().context("failed to load configuration")?;
    tracing::info!(bind = %config.server.bind, stadiums = config.calendar.stadiums.len(), "starting matchday");

    let context = AppContext::from_config(&config).context("failed to wire application")?;
    let app = router(context);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
