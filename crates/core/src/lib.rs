// crates/core/src/lib.rs
//! N-Queens solve engine.
//!
//! Two interchangeable searches behind the [`Solver`] trait:
//! - [`BacktrackingSolver`]: conflict sets of occupied lines
//! - [`BitmaskSolver`]: the same search over integer bitmasks
//!
//! Both report progress and visual steps through a [`SolveObserver`].

pub mod backtracking;
pub mod bitmask;
pub mod board;
pub mod error;
pub mod observer;
pub mod solver;
pub mod types;

pub use backtracking::BacktrackingSolver;
pub use bitmask::BitmaskSolver;
pub use board::{is_valid_solution, Board, Masks};
pub use error::*;
pub use observer::{NoopObserver, ProgressFn, SolveObserver, StepTrace};
pub use solver::{solve, solver_for, Solver};
pub use types::*;
