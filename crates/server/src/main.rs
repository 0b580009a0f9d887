// crates/server/src/main.rs
//! N-Queens server binary.
//!
//! Loads `.env`, reads configuration from the environment, then serves the
//! solve API until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use nqueens_server::{create_app_with_state, init_metrics, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nqueens_server=info,tower_http=info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    init_metrics();

    let state = AppState::new(config.clone());
    spawn_rate_limit_cleanup(state.clone());
    let app = create_app_with_state(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        max_n = config.max_n,
        job_timeout_ms = config.jobs.timeout.as_millis() as u64,
        job_retention_ms = config.jobs.retention.as_millis() as u64,
        cors_origin = %config.cors_origin,
        "N-Queens server listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Forget idle client IPs once per rate-limit window.
fn spawn_rate_limit_cleanup(state: Arc<AppState>) {
    let period = state.config.rate_limit.window;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            state.rate_limiter.retain_recent();
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
