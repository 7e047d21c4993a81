use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reporthaus::api::{build_app, AppState};
use reporthaus::{AppConfig, ReportHaus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let reporthaus = ReportHaus::new(&config.database)
        .await
        .with_context(|| format!("failed to connect to {}", config.database.redacted_target()))?;
    reporthaus
        .health_check()
        .await
        .context("database health check failed")?;

    let state = AppState::from_config(reporthaus.store(), &config.pagination);
    let app = build_app(state, &config.server);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!(
        address = %address,
        environment = %config.server.environment,
        cors_origins = ?config.server.cors_origins,
        "ReportHaus API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    reporthaus.pool().close().await;
    info!("ReportHaus API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
