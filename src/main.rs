use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_recs::{
    api::{create_router, AppState, SessionStore},
    config::Config,
    services::{Artifacts, OmdbProvider},
};

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recs=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Without the artifacts there is nothing to serve
    let artifacts = Artifacts::load(&config.artifacts_dir).context("Failed to load artifacts")?;

    let provider = OmdbProvider::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;

    let sessions = SessionStore::with_limits(
        Duration::from_secs(config.session_idle_secs),
        config.max_sessions,
    );
    let state = AppState::new(&artifacts, Arc::new(provider)).with_sessions(sessions.clone());

    tokio::spawn(async move { sessions.run_sweeper(SESSION_SWEEP_PERIOD).await });

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, movies = artifacts.catalog.len(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
