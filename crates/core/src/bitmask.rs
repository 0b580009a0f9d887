// crates/core/src/bitmask.rs
//! Backtracking over integer bitmasks: O(1) conflict tests per row.

use crate::board::{full_mask, Board, Masks};
use crate::error::SolveError;
use crate::observer::SolveObserver;
use crate::solver::Solver;
use crate::types::{check_board_size, Progress, SolveMode, SolveOutcome, StepEvent, MAX_SUPPORTED_N};

/// Report progress after every this many solutions. Coarser than the
/// set-based solver since this one finds solutions much faster.
pub const PROGRESS_EVERY: u64 = 100;

/// Bitmask solver.
///
/// Legal columns for a row are `full & !(cols | diag1 | diag2)`; candidates
/// are taken lowest bit first, which visits columns left to right and gives
/// the same discovery order as [`BacktrackingSolver`](crate::BacktrackingSolver).
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmaskSolver;

impl Solver for BitmaskSolver {
    fn solve(
        &self,
        n: usize,
        mode: SolveMode,
        observer: &mut dyn SolveObserver,
    ) -> Result<SolveOutcome, SolveError> {
        check_board_size(n, MAX_SUPPORTED_N)?;

        let collect = mode.collects_boards();
        let mut search = Search {
            n,
            full: full_mask(n),
            mode,
            board: collect.then(|| Board::new(n)),
            solution_count: 0,
            operations: 0,
            solutions: collect.then(Vec::new),
            trace_steps: observer.wants_steps(),
            observer,
        };
        search.place_row(0, Masks::default());

        tracing::debug!(
            n,
            mode = %mode,
            solutions = search.solution_count,
            operations = search.operations,
            "bitmask search finished"
        );

        Ok(SolveOutcome {
            solution_count: search.solution_count,
            solutions: search.solutions,
            operations: search.operations,
        })
    }
}

struct Search<'a> {
    n: usize,
    full: u64,
    mode: SolveMode,
    /// Only kept when boards are materialized.
    board: Option<Board>,
    solution_count: u64,
    operations: u64,
    solutions: Option<Vec<Vec<String>>>,
    trace_steps: bool,
    observer: &'a mut dyn SolveObserver,
}

impl Search<'_> {
    fn place_row(&mut self, row: usize, masks: Masks) -> bool {
        if row == self.n {
            return self.record_solution();
        }

        let mut available = masks.available(self.full);
        while available != 0 {
            self.operations += 1;

            let bit = available & available.wrapping_neg();
            let col = bit.trailing_zeros() as usize;

            if let Some(board) = self.board.as_mut() {
                board.place(row, col);
            }
            self.step(|operations| StepEvent::Place {
                row,
                col,
                operations,
                masks: Some(masks),
            });

            if self.place_row(row + 1, masks.advance(bit)) {
                return true;
            }

            if let Some(board) = self.board.as_mut() {
                board.remove(row, col);
            }
            self.step(|operations| StepEvent::Remove {
                row,
                col,
                operations,
                masks: Some(masks),
            });

            available &= available - 1;
        }

        false
    }

    fn record_solution(&mut self) -> bool {
        self.solution_count += 1;

        if let (Some(solutions), Some(board)) = (self.solutions.as_mut(), self.board.as_ref()) {
            solutions.push(board.to_rows());
        }

        let solution_count = self.solution_count;
        self.step(|operations| StepEvent::Solution {
            solution_count,
            operations,
        });

        if self.solution_count % PROGRESS_EVERY == 0 {
            self.observer.on_progress(Progress {
                solutions_found: self.solution_count,
                operations: self.operations,
            });
        }

        self.mode == SolveMode::FindFirst
    }

    fn step(&mut self, build: impl FnOnce(u64) -> StepEvent) {
        if self.trace_steps {
            self.observer.on_step(build(self.operations));
        }
    }
}
