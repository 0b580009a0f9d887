// crates/server/src/lib.rs
//! N-Queens server library.
//!
//! Axum HTTP boundary over the solve engine: accepts solve requests, runs
//! them as background jobs and serves their progress and results.

pub mod config;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use config::{ConfigError, JobSettings, RateLimitSettings, ServerConfig};
pub use error::*;
pub use jobs::{JobManager, JobStatus, JobView};
pub use crate::metrics::{init_metrics, render_metrics};
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

const CSP_DIRECTIVES: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'; \
     script-src 'self'; img-src 'self' data: https:";

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - Solve, health and metrics routes
/// - CORS for the configured origin
/// - Security headers on every response
/// - Request tracing
pub fn create_app(config: ServerConfig) -> Router {
    create_app_with_state(AppState::new(config))
}

/// Build the app around existing state (tests keep a handle on the jobs).
pub fn create_app_with_state(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .merge(api_routes(state))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CSP_DIRECTIVES),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer
            .allow_origin(AllowOrigin::exact(value))
            .allow_credentials(true),
        Err(e) => {
            tracing::warn!(origin, error = %e, "Invalid CORS_ORIGIN, cross-origin requests disabled");
            layer
        }
    }
}

// ============================================================================
// Integration Tests
// ============================================================================
