// crates/server/src/jobs/mod.rs
//! Solve job tracking.
//!
//! Provides:
//! - `JobManager`: owns job records, their timeouts and retention
//! - `spawn_solve`: runs a search on the blocking pool for a job
//! - `Clock`: time source, swappable in tests

pub mod clock;
pub mod manager;
pub mod runner;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::JobManager;
pub use runner::{spawn_solve, spawn_with};
pub use types::{Job, JobCounts, JobError, JobId, JobStatus, JobView, ProgressUpdate, TIMEOUT_MESSAGE};
