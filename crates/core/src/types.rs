// crates/core/src/types.rs
//! Wire-level types shared by the solvers, the job manager and the HTTP layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Masks;
use crate::error::SolveError;

/// Widest board the engine can search. Bitmask state lives in `u64`, and the
/// diagonal masks need one spare bit above the board while shifting.
pub const MAX_SUPPORTED_N: usize = 32;

/// Default upper bound on `n` accepted at the boundary.
pub const DEFAULT_MAX_N: usize = 15;

/// Search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Algorithm {
    Backtracking,
    Bitmask,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Backtracking, Algorithm::Bitmask];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backtracking => "backtracking",
            Self::Bitmask => "bitmask",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| SolveError::UnknownAlgorithm(s.to_string()))
    }
}

/// What the search should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SolveMode {
    /// Stop at the first solution.
    FindFirst,
    /// Enumerate and materialize every solution.
    FindAll,
    /// Count every solution without materializing boards.
    CountAll,
}

impl SolveMode {
    pub const ALL: [SolveMode; 3] = [SolveMode::FindFirst, SolveMode::FindAll, SolveMode::CountAll];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindFirst => "findFirst",
            Self::FindAll => "findAll",
            Self::CountAll => "countAll",
        }
    }

    /// Whether solution boards are collected in this mode.
    pub fn collects_boards(&self) -> bool {
        !matches!(self, Self::CountAll)
    }
}

impl fmt::Display for SolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolveMode {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| SolveError::UnknownMode(s.to_string()))
    }
}

/// An immutable solve request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveParams {
    pub n: usize,
    pub algorithm: Algorithm,
    pub mode: SolveMode,
}

impl SolveParams {
    pub fn new(n: usize, algorithm: Algorithm, mode: SolveMode) -> Self {
        Self { n, algorithm, mode }
    }

    /// Reject sizes outside `1..=max_n` (and beyond what the engine supports).
    pub fn validate(&self, max_n: usize) -> Result<(), SolveError> {
        check_board_size(self.n, max_n)
    }
}

pub(crate) fn check_board_size(n: usize, max_n: usize) -> Result<(), SolveError> {
    let max = max_n.min(MAX_SUPPORTED_N);
    if n == 0 || n > max {
        return Err(SolveError::invalid_size(n, max));
    }
    Ok(())
}

/// Cumulative counters reported while a search runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub solutions_found: u64,
    pub operations: u64,
}

/// Final result of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveOutcome {
    pub solution_count: u64,
    /// Row strings per solution, in discovery order. `None` for `countAll`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solutions: Option<Vec<Vec<String>>>,
    pub operations: u64,
}

/// One visual step of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StepEvent {
    #[serde(rename_all = "camelCase")]
    Place {
        row: usize,
        col: usize,
        operations: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        masks: Option<Masks>,
    },
    #[serde(rename_all = "camelCase")]
    Remove {
        row: usize,
        col: usize,
        operations: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        masks: Option<Masks>,
    },
    #[serde(rename_all = "camelCase")]
    Solution { solution_count: u64, operations: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_round_trips_through_str() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!(matches!(
            "dancing-links".parse::<Algorithm>(),
            Err(SolveError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_mode_wire_names() {
        let json = serde_json::to_string(&SolveMode::FindFirst).unwrap();
        assert_eq!(json, "\"findFirst\"");
        let mode: SolveMode = serde_json::from_str("\"countAll\"").unwrap();
        assert_eq!(mode, SolveMode::CountAll);
        assert!(!SolveMode::CountAll.collects_boards());
        assert!(SolveMode::FindAll.collects_boards());
    }

    #[test]
    fn test_validate_bounds() {
        let params = SolveParams::new(8, Algorithm::Bitmask, SolveMode::FindAll);
        assert!(params.validate(15).is_ok());
        assert!(SolveParams { n: 0, ..params }.validate(15).is_err());
        assert_eq!(
            SolveParams { n: 16, ..params }.validate(15),
            Err(SolveError::invalid_size(16, 15))
        );
        // Configured maximum is clamped to what the engine can represent.
        assert_eq!(
            SolveParams { n: 33, ..params }.validate(64),
            Err(SolveError::invalid_size(33, MAX_SUPPORTED_N))
        );
    }

    #[test]
    fn test_outcome_omits_solutions_when_counting() {
        let outcome = SolveOutcome {
            solution_count: 92,
            solutions: None,
            operations: 1_000,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"solutionCount\":92"));
        assert!(!json.contains("solutions"));
    }

    #[test]
    fn test_step_event_encoding() {
        let step = StepEvent::Solution {
            solution_count: 3,
            operations: 40,
        };
        let json = serde_json::to_value(step).unwrap();
        assert_eq!(json["type"], "solution");
        assert_eq!(json["solutionCount"], 3);

        let place = StepEvent::Place {
            row: 1,
            col: 2,
            operations: 5,
            masks: None,
        };
        let json = serde_json::to_value(place).unwrap();
        assert_eq!(json["type"], "place");
        assert!(json.get("masks").is_none());
    }
}
