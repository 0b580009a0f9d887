// crates/core/src/observer.rs
//! Injected sink for search events.
//!
//! Solvers call into a `SolveObserver` synchronously from the search loop:
//! - `on_progress` at each solver's cadence (every 10th / 100th solution)
//! - `on_step` on every placement, removal and solution

use crate::types::{Progress, StepEvent};

pub trait SolveObserver {
    fn on_progress(&mut self, _progress: Progress) {}

    fn on_step(&mut self, _step: StepEvent) {}

    /// Whether `on_step` does anything. Solvers skip building step events
    /// when this returns false.
    fn wants_steps(&self) -> bool {
        false
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SolveObserver for NoopObserver {}

/// Adapts a closure over `Progress` into an observer.
pub struct ProgressFn<F>(pub F);

impl<F> SolveObserver for ProgressFn<F>
where
    F: FnMut(Progress),
{
    fn on_progress(&mut self, progress: Progress) {
        (self.0)(progress)
    }
}

/// Records step and progress events, optionally capped so a long search
/// cannot grow the trace without bound.
#[derive(Debug, Default, Clone)]
pub struct StepTrace {
    pub steps: Vec<StepEvent>,
    pub progress: Vec<Progress>,
    limit: Option<usize>,
    dropped: u64,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Steps that were not recorded because the limit was reached.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl SolveObserver for StepTrace {
    fn on_progress(&mut self, progress: Progress) {
        self.progress.push(progress);
    }

    fn on_step(&mut self, step: StepEvent) {
        match self.limit {
            Some(limit) if self.steps.len() >= limit => self.dropped += 1,
            _ => self.steps.push(step),
        }
    }

    fn wants_steps(&self) -> bool {
        true
    }
}
