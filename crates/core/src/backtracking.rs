// crates/core/src/backtracking.rs
//! Row-by-row backtracking with set-membership conflict checks.

use crate::board::{Board, ConflictSets};
use crate::error::SolveError;
use crate::observer::SolveObserver;
use crate::solver::Solver;
use crate::types::{check_board_size, Progress, SolveMode, SolveOutcome, StepEvent, MAX_SUPPORTED_N};

/// Report progress after every this many solutions.
pub const PROGRESS_EVERY: u64 = 10;

/// Classic backtracking solver.
///
/// Columns are tried in ascending order on every row, so solutions are
/// discovered in lexicographic order of their column vectors.
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktrackingSolver;

impl Solver for BacktrackingSolver {
    fn solve(
        &self,
        n: usize,
        mode: SolveMode,
        observer: &mut dyn SolveObserver,
    ) -> Result<SolveOutcome, SolveError> {
        check_board_size(n, MAX_SUPPORTED_N)?;

        let mut search = Search {
            n,
            mode,
            board: Board::new(n),
            sets: ConflictSets::new(),
            solution_count: 0,
            operations: 0,
            solutions: mode.collects_boards().then(Vec::new),
            trace_steps: observer.wants_steps(),
            observer,
        };
        search.place_row(0);

        tracing::debug!(
            n,
            mode = %mode,
            solutions = search.solution_count,
            operations = search.operations,
            "backtracking search finished"
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
    mode: SolveMode,
    board: Board,
    sets: ConflictSets,
    solution_count: u64,
    operations: u64,
    solutions: Option<Vec<Vec<String>>>,
    trace_steps: bool,
    observer: &'a mut dyn SolveObserver,
}

impl Search<'_> {
    /// Returns true once the search should stop (first solution found in
    /// `findFirst` mode).
    fn place_row(&mut self, row: usize) -> bool {
        if row == self.n {
            return self.record_solution();
        }

        for col in 0..self.n {
            if !self.is_safe(row, col) {
                continue;
            }

            self.board.place(row, col);
            self.sets.occupy(row, col);
            self.step(|operations| StepEvent::Place {
                row,
                col,
                operations,
                masks: None,
            });

            if self.place_row(row + 1) {
                return true;
            }

            self.board.remove(row, col);
            self.sets.release(row, col);
            self.step(|operations| StepEvent::Remove {
                row,
                col,
                operations,
                masks: None,
            });
        }

        false
    }

    fn is_safe(&mut self, row: usize, col: usize) -> bool {
        self.operations += 1;
        self.sets.is_safe(row, col)
    }

    fn record_solution(&mut self) -> bool {
        self.solution_count += 1;

        if let Some(solutions) = self.solutions.as_mut() {
            solutions.push(self.board.to_rows());
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
