// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::jobs::JobManager;
use crate::rate_limit::IpRateLimiter;

/// Shared application state accessible from all route handlers.
#[derive(Debug)]
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    pub config: ServerConfig,
    /// Solve jobs, shared with the solver tasks.
    pub jobs: JobManager,
    pub rate_limiter: IpRateLimiter,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let jobs = JobManager::new(config.jobs);
        Self::with_jobs(config, jobs)
    }

    /// Create with an externally-built job manager (tests swap the clock).
    pub fn with_jobs(config: ServerConfig, jobs: JobManager) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            rate_limiter: IpRateLimiter::new(config.rate_limit),
            config,
            jobs,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
