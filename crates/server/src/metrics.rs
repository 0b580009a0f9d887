//! Application metrics for Prometheus monitoring.
//!
//! This module provides:
//! - Prometheus metrics recorder initialization
//! - Metric definitions for the job lifecycle
//! - Helper functions for recording metrics

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use nqueens_core::SolveParams;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Serializes `init_metrics` so only one caller installs a recorder.
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Initialize the Prometheus metrics recorder.
///
/// Returns `true` only for the call that installed the recorder. `false` if
/// already initialized or if another global recorder is in place, in which
/// case `render_metrics` stays `None`.
pub fn init_metrics() -> bool {
    let _guard = INIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    if PROMETHEUS_HANDLE.get().is_some() {
        return false;
    }

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("Failed to set global metrics recorder (already set)");
        return false;
    }

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        return false;
    }
    describe_metrics();
    tracing::info!("Prometheus metrics initialized");
    true
}

fn describe_metrics() {
    describe_counter!("nqueens_jobs_created_total", "Solve jobs accepted");
    describe_counter!("nqueens_jobs_completed_total", "Solve jobs that finished normally");
    describe_counter!(
        "nqueens_jobs_failed_total",
        "Solve jobs that failed, by reason (error or timeout)"
    );
    describe_histogram!(
        "nqueens_solve_duration_seconds",
        "Time from job creation to completion in seconds"
    );
    describe_gauge!("nqueens_jobs_retained", "Jobs currently held in memory");
}

/// Render current metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

pub fn record_job_created(retained: usize) {
    counter!("nqueens_jobs_created_total").increment(1);
    gauge!("nqueens_jobs_retained").set(retained as f64);
}

pub fn record_job_completed(params: &SolveParams, elapsed: Duration) {
    counter!("nqueens_jobs_completed_total").increment(1);
    histogram!(
        "nqueens_solve_duration_seconds",
        "algorithm" => params.algorithm.as_str(),
        "mode" => params.mode.as_str()
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_job_failed(reason: &'static str) {
    counter!("nqueens_jobs_failed_total", "reason" => reason).increment(1);
}
