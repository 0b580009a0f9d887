// crates/server/src/routes/mod.rs
//! HTTP route handlers for the N-Queens server.

pub mod health;
pub mod metrics;
pub mod solve;

use std::sync::Arc;

use axum::{middleware, Router};

use crate::error::ApiError;
use crate::rate_limit::rate_limit;
use crate::state::AppState;

/// Create the combined router.
///
/// Routes:
/// - POST /api/v1/solve - Start a solve job (202 + jobId)
/// - GET  /api/v1/solve/{job_id} - Job status, progress, result or error
/// - GET  /health - Liveness and job counts
/// - GET  /metrics - Prometheus scrape endpoint
///
/// Everything under `/api` is rate limited per client IP, unmatched paths
/// included. Unknown paths get a 404 error envelope.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", solve::router())
        .merge(health::router())
        .merge(metrics::router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
