// crates/core/src/error.rs
use thiserror::Error;

/// Errors that can occur when starting a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("Board size {n} is out of range (expected 1..={max})")]
    InvalidBoardSize { n: usize, max: usize },

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),
}

impl SolveError {
    pub fn invalid_size(n: usize, max: usize) -> Self {
        Self::InvalidBoardSize { n, max }
    }
}
