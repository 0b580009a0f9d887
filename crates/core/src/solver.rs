// crates/core/src/solver.rs
//! Common entry point for both search strategies.

use crate::backtracking::BacktrackingSolver;
use crate::bitmask::BitmaskSolver;
use crate::error::SolveError;
use crate::observer::SolveObserver;
use crate::types::{Algorithm, SolveMode, SolveOutcome, SolveParams};

/// A synchronous, single-threaded N-Queens search.
///
/// Implementations hold no state between calls; every call owns its own
/// search state, so one solver value can serve concurrent callers.
pub trait Solver: Send + Sync {
    fn solve(
        &self,
        n: usize,
        mode: SolveMode,
        observer: &mut dyn SolveObserver,
    ) -> Result<SolveOutcome, SolveError>;
}

static BACKTRACKING: BacktrackingSolver = BacktrackingSolver;
static BITMASK: BitmaskSolver = BitmaskSolver;

/// Look up the solver for an algorithm.
pub fn solver_for(algorithm: Algorithm) -> &'static dyn Solver {
    match algorithm {
        Algorithm::Backtracking => &BACKTRACKING,
        Algorithm::Bitmask => &BITMASK,
    }
}

/// Run the search described by `params`.
pub fn solve(params: SolveParams, observer: &mut dyn SolveObserver) -> Result<SolveOutcome, SolveError> {
    solver_for(params.algorithm).solve(params.n, params.mode, observer)
}
