// crates/server/src/jobs/manager.rs
//! In-memory table of solve jobs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use nqueens_core::{SolveOutcome, SolveParams};
use tokio::task::AbortHandle;

use super::clock::{Clock, SystemClock};
use super::types::{Job, JobCounts, JobError, JobId, JobStatus, ProgressUpdate, TIMEOUT_MESSAGE};
use crate::config::JobSettings;
use crate::metrics;

/// Owns every job from creation until the retention sweep drops it.
///
/// Cheap to clone; clones share the same table. The solver's progress
/// callback, the timeout task and request handlers all hold one.
///
/// Transitions out of `Processing` happen under the table lock and only
/// from `Processing`, so whichever of completion and timeout gets there
/// first wins and the other becomes a no-op. A job's timeout task lives
/// only while the job is processing.
#[derive(Clone)]
pub struct JobManager {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    timers: Arc<Mutex<HashMap<JobId, AbortHandle>>>,
    clock: Arc<dyn Clock>,
    settings: JobSettings,
}

enum Terminal {
    Completed(SolveOutcome),
    Failed { message: String, reason: &'static str },
}

impl JobManager {
    pub fn new(settings: JobSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: JobSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            timers: Arc::new(Mutex::new(HashMap::new())),
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> JobSettings {
        self.settings
    }

    /// Register a new `Processing` job and arm its timeout.
    ///
    /// Also sweeps finished jobs older than the retention window.
    pub fn create_job(&self, id: impl Into<JobId>, params: SolveParams) -> Result<Job, JobError> {
        let id = id.into();
        let now = self.clock.now();

        let (job, retained) = {
            let mut jobs = self.table();
            if jobs.contains_key(&id) {
                return Err(JobError::AlreadyExists(id));
            }
            let job = Job::new(id.clone(), params, now);
            jobs.insert(id.clone(), job.clone());
            // Armed under the table lock so `finish` always finds the timer.
            self.arm_timeout(id.clone());
            let swept = self.sweep_locked(&mut jobs);
            if swept > 0 {
                tracing::debug!(swept, "Retention sweep removed finished jobs");
            }
            (job, jobs.len())
        };

        metrics::record_job_created(retained);
        tracing::info!(
            job_id = %id,
            n = params.n,
            algorithm = %params.algorithm,
            mode = %params.mode,
            "Job created"
        );

        Ok(job)
    }

    /// Merge partial progress into a `Processing` job. No-op otherwise.
    pub fn update_progress(&self, id: &str, update: ProgressUpdate) {
        let mut jobs = self.table();
        if let Some(job) = jobs.get_mut(id) {
            if job.status == JobStatus::Processing {
                update.apply(&mut job.progress);
            }
        }
    }

    /// Mark a `Processing` job completed. Returns whether the job changed.
    pub fn complete_job(&self, id: &str, result: SolveOutcome) -> bool {
        self.finish(id, Terminal::Completed(result))
    }

    /// Mark a `Processing` job failed. Returns whether the job changed.
    pub fn fail_job(&self, id: &str, message: impl Into<String>) -> bool {
        self.finish(
            id,
            Terminal::Failed {
                message: message.into(),
                reason: "error",
            },
        )
    }

    /// Snapshot of a job, if it exists.
    pub fn get_job(&self, id: &str) -> Option<Job> {
        self.table().get(id).cloned()
    }

    /// Drop finished jobs whose `completed_at` is further in the past than
    /// the retention window. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let mut jobs = self.table();
        self.sweep_locked(&mut jobs)
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    pub fn counts(&self) -> JobCounts {
        self.table()
            .values()
            .fold(JobCounts::default(), |mut counts, job| {
                match job.status {
                    JobStatus::Processing => counts.processing += 1,
                    JobStatus::Completed => counts.completed += 1,
                    JobStatus::Failed => counts.failed += 1,
                }
                counts
            })
    }

    fn finish(&self, id: &str, terminal: Terminal) -> bool {
        let changed = self.transition(id, terminal);
        if changed {
            self.disarm_timeout(id);
        }
        changed
    }

    fn transition(&self, id: &str, terminal: Terminal) -> bool {
        let now = self.clock.now();
        let mut jobs = self.table();
        let Some(job) = jobs.get_mut(id) else {
            tracing::debug!(job_id = %id, "Ignoring transition for unknown job");
            return false;
        };
        if job.status.is_terminal() {
            tracing::debug!(
                job_id = %id,
                status = job.status.as_str(),
                "Ignoring transition for finished job"
            );
            return false;
        }

        job.completed_at = Some(now);
        let elapsed = (now - job.created_at).to_std().unwrap_or_default();
        match terminal {
            Terminal::Completed(result) => {
                tracing::info!(
                    job_id = %id,
                    solutions = result.solution_count,
                    operations = result.operations,
                    duration_ms = elapsed.as_millis() as u64,
                    "Job completed"
                );
                job.status = JobStatus::Completed;
                job.result = Some(result);
                metrics::record_job_completed(&job.params, elapsed);
            }
            Terminal::Failed { message, reason } => {
                tracing::warn!(job_id = %id, reason, error = %message, "Job failed");
                job.status = JobStatus::Failed;
                job.error = Some(message);
                metrics::record_job_failed(reason);
            }
        }
        true
    }

    fn arm_timeout(&self, id: JobId) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(job_id = %id, "No async runtime, job timeout not armed");
            return;
        };
        let manager = self.clone();
        let timeout = self.settings.timeout;
        let job_id = id.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            manager.finish(
                &job_id,
                Terminal::Failed {
                    message: TIMEOUT_MESSAGE.to_string(),
                    reason: "timeout",
                },
            );
        });
        self.timer_table().insert(id, task.abort_handle());
    }

    fn disarm_timeout(&self, id: &str) {
        if let Some(timer) = self.timer_table().remove(id) {
            timer.abort();
        }
    }

    /// Timeout tasks still pending.
    pub(crate) fn armed_timeouts(&self) -> usize {
        self.timer_table().len()
    }

    fn sweep_locked(&self, jobs: &mut HashMap<JobId, Job>) -> usize {
        let now = self.clock.now();
        let retention = chrono::Duration::from_std(self.settings.retention)
            .unwrap_or(chrono::Duration::MAX);
        let before = jobs.len();
        jobs.retain(|_, job| match job.completed_at {
            Some(done) => now - done <= retention,
            None => true,
        });
        before - jobs.len()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<JobId, Job>> {
        self.jobs.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Job table mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn timer_table(&self) -> MutexGuard<'_, HashMap<JobId, AbortHandle>> {
        self.timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for JobManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobManager")
            .field("jobs", &self.len())
            .field("settings", &self.settings)
            .finish()
    }
}
