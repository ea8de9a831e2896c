use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod config;
mod cricket;
mod dashboard;

use config::Config;
use cricket::{LogisticEstimator, WinEstimator};
use dashboard::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // The model is loaded exactly once; without it nothing can be served.
    let estimator: Arc<dyn WinEstimator> = Arc::new(
        LogisticEstimator::load(&config.model_path)
            .context("Cannot start without a win-probability model")?,
    );
    info!(
        "Loaded model '{}' from {}",
        estimator.name(),
        config.model_path
    );
    info!("Score policy: {:?}", config.score_policy);

    let state = AppState {
        estimator: Arc::clone(&estimator),
        score_policy: config.score_policy,
        estimator_timeout: Duration::from_millis(config.estimator_timeout_ms),
        live_score_search_url: config.live_score_search_url.clone(),
    };
    match &config.schedule_path {
        Some(path) => info!("Serving fixture schedule from {}", path),
        None => warn!("No SCHEDULE_PATH configured; /schedule.pdf will return 404"),
    }
    let app = dashboard::router(state, config.schedule_path.as_deref());

    let addr: SocketAddr = config
        .dashboard_addr
        .parse()
        .with_context(|| format!("Invalid DASHBOARD_ADDR {}", config.dashboard_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Calculator listening on http://{}", addr);

    // Run server (blocks until Ctrl-C)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down; releasing model '{}'", estimator.name());
    drop(estimator);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
