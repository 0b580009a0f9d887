// crates/server/src/jobs/types.rs
//! Types for the solve job system.

use chrono::{DateTime, Utc};
use nqueens_core::{Progress, SolveOutcome, SolveParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque job identifier. The HTTP layer mints UUID v4 strings.
pub type JobId = String;

/// Message recorded when a job outlives its timeout.
pub const TIMEOUT_MESSAGE: &str = "Job execution timeout exceeded";

/// Lifecycle of a job: `Processing` moves to exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

/// One solve request's tracked record.
///
/// `result` is set only when `Completed`, `error` only when `Failed`, and
/// `completed_at` only once the job is terminal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_id: JobId,
    pub status: JobStatus,
    pub params: SolveParams,
    pub progress: Progress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SolveOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub(crate) fn new(job_id: JobId, params: SolveParams, created_at: DateTime<Utc>) -> Self {
        Self {
            job_id,
            status: JobStatus::Processing,
            params,
            progress: Progress::default(),
            result: None,
            error: None,
            created_at,
            completed_at: None,
        }
    }
}

/// Partial progress: absent fields leave the stored value unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub solutions_found: Option<u64>,
    pub operations: Option<u64>,
}

impl ProgressUpdate {
    pub(crate) fn apply(&self, progress: &mut Progress) {
        if let Some(found) = self.solutions_found {
            progress.solutions_found = found;
        }
        if let Some(ops) = self.operations {
            progress.operations = ops;
        }
    }
}

impl From<Progress> for ProgressUpdate {
    fn from(p: Progress) -> Self {
        Self {
            solutions_found: Some(p.solutions_found),
            operations: Some(p.operations),
        }
    }
}

/// Boundary view of a job: only the payload matching `status` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SolveOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        let mut view = Self {
            job_id: job.job_id,
            status: job.status,
            progress: None,
            result: None,
            error: None,
        };
        match job.status {
            JobStatus::Processing => view.progress = Some(job.progress),
            JobStatus::Completed => view.result = job.result,
            JobStatus::Failed => view.error = job.error,
        }
        view
    }
}

/// Number of jobs per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobCounts {
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("Job already exists: {0}")]
    AlreadyExists(JobId),
}
