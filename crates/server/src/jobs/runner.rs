// crates/server/src/jobs/runner.rs
//! Runs solves off the async executor and reports back to the manager.

use std::any::Any;

use nqueens_core::{Progress, ProgressFn, SolveError, SolveOutcome, SolveParams};
use tokio::task::JoinHandle;

use super::manager::JobManager;
use super::types::JobId;

/// Run `work` on the blocking pool and record its outcome on job `id`.
///
/// `Ok` completes the job, `Err` or a panic fails it. Either is ignored
/// if the job already timed out.
pub fn spawn_with<F>(manager: JobManager, id: JobId, work: F) -> JoinHandle<()>
where
    F: FnOnce(&JobManager, &str) -> Result<SolveOutcome, SolveError> + Send + 'static,
{
    tokio::spawn(async move {
        let worker = manager.clone();
        let worker_id = id.clone();
        let joined = tokio::task::spawn_blocking(move || work(&worker, &worker_id)).await;

        match joined {
            Ok(Ok(outcome)) => {
                manager.complete_job(&id, outcome);
            }
            Ok(Err(e)) => {
                manager.fail_job(&id, e.to_string());
            }
            Err(e) if e.is_panic() => {
                let message = panic_message(e.into_panic());
                tracing::error!(job_id = %id, panic = %message, "Solver panicked");
                manager.fail_job(&id, format!("Solver panicked: {message}"));
            }
            Err(e) => {
                manager.fail_job(&id, format!("Solver task cancelled: {e}"));
            }
        }
    })
}

/// Start the search for an already-created job, streaming progress into it.
pub fn spawn_solve(manager: JobManager, id: JobId, params: SolveParams) -> JoinHandle<()> {
    spawn_with(manager, id, move |manager, id| {
        let _span = tracing::debug_span!("solve", job_id = %id).entered();
        let mut observer = ProgressFn(|p: Progress| manager.update_progress(id, p.into()));
        nqueens_core::solve(params, &mut observer)
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JobSettings;
    use crate::jobs::types::{JobStatus, TIMEOUT_MESSAGE};
    use nqueens_core::{Algorithm, SolveMode};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn manager() -> JobManager {
        JobManager::new(JobSettings::default())
    }

    fn params(n: usize, algorithm: Algorithm, mode: SolveMode) -> SolveParams {
        SolveParams::new(n, algorithm, mode)
    }

    #[tokio::test]
    async fn test_solve_completes_job() {
        let manager = manager();
        let p = params(6, Algorithm::Backtracking, SolveMode::FindAll);
        manager.create_job("a", p).unwrap();

        spawn_solve(manager.clone(), "a".into(), p).await.unwrap();

        let job = manager.get_job("a").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        let result = job.result.unwrap();
        assert_eq!(result.solution_count, 4);
        assert_eq!(result.solutions.map(|s| s.len()), Some(4));
        assert!(job.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_progress_streamed_into_job() {
        let manager = manager();
        let p = params(9, Algorithm::Bitmask, SolveMode::CountAll);
        manager.create_job("a", p).unwrap();

        spawn_solve(manager.clone(), "a".into(), p).await.unwrap();

        let job = manager.get_job("a").unwrap();
        assert_eq!(job.result.unwrap().solution_count, 352);
        // Last report came at the 300th solution.
        assert_eq!(job.progress.solutions_found, 300);
        assert!(job.progress.operations > 0);
    }

    #[tokio::test]
    async fn test_solver_error_fails_job() {
        let manager = manager();
        let p = params(4, Algorithm::Bitmask, SolveMode::FindFirst);
        manager.create_job("a", p).unwrap();

        spawn_with(manager.clone(), "a".into(), |_, _| {
            Err(SolveError::invalid_size(0, 32))
        })
        .await
        .unwrap();

        let job = manager.get_job("a").unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.error,
            Some(SolveError::invalid_size(0, 32).to_string())
        );
    }

    #[tokio::test]
    async fn test_panic_fails_job() {
        let manager = manager();
        let p = params(4, Algorithm::Bitmask, SolveMode::FindFirst);
        manager.create_job("a", p).unwrap();

        spawn_with(manager.clone(), "a".into(), |_, _| panic!("board on fire"))
            .await
            .unwrap();

        let job = manager.get_job("a").unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("Solver panicked: board on fire"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_after_timeout_is_dropped() {
        let manager = JobManager::new(JobSettings {
            timeout: Duration::from_secs(1),
            ..JobSettings::default()
        });
        let p = params(4, Algorithm::Bitmask, SolveMode::FindFirst);
        manager.create_job("a", p).unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(manager.get_job("a").unwrap().status, JobStatus::Failed);

        spawn_with(manager.clone(), "a".into(), |_, _| {
            Ok(SolveOutcome {
                solution_count: 1,
                solutions: None,
                operations: 1,
            })
        })
        .await
        .unwrap();

        let job = manager.get_job("a").unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some(TIMEOUT_MESSAGE));
        assert!(job.result.is_none());
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7_u8)), "unknown panic");
    }
}
