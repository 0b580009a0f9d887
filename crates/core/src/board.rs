// crates/core/src/board.rs
//! Per-search state: the board itself and the two conflict-tracking
//! representations used by the solvers.
//!
//! Everything here is owned by exactly one running search and dropped when
//! it returns. Nothing is shared between invocations.

use std::collections::HashSet;

use serde::Serialize;

/// Character used for an occupied square in serialized boards.
pub const QUEEN: char = 'Q';
/// Character used for an empty square in serialized boards.
pub const EMPTY: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Queen,
}

impl Cell {
    fn as_char(self) -> char {
        match self {
            Cell::Empty => EMPTY,
            Cell::Queen => QUEEN,
        }
    }
}

/// An n×n grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    n: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![Cell::Empty; n * n],
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.n + col]
    }

    pub fn place(&mut self, row: usize, col: usize) {
        self.cells[row * self.n + col] = Cell::Queen;
    }

    pub fn remove(&mut self, row: usize, col: usize) {
        self.cells[row * self.n + col] = Cell::Empty;
    }

    /// Serialize as one string per row, `Q` for a queen and `.` otherwise.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.n.max(1))
            .map(|row| row.iter().map(|c| c.as_char()).collect())
            .collect()
    }
}

/// Occupied lines for the set-based solver.
///
/// Diagonals are keyed by `row - col` (stored as `isize`) and `row + col`.
#[derive(Debug, Default)]
pub struct ConflictSets {
    cols: HashSet<usize>,
    diag1: HashSet<isize>,
    diag2: HashSet<usize>,
}

impl ConflictSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_safe(&self, row: usize, col: usize) -> bool {
        !self.cols.contains(&col)
            && !self.diag1.contains(&down_diagonal(row, col))
            && !self.diag2.contains(&(row + col))
    }

    pub fn occupy(&mut self, row: usize, col: usize) {
        self.cols.insert(col);
        self.diag1.insert(down_diagonal(row, col));
        self.diag2.insert(row + col);
    }

    pub fn release(&mut self, row: usize, col: usize) {
        self.cols.remove(&col);
        self.diag1.remove(&down_diagonal(row, col));
        self.diag2.remove(&(row + col));
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty() && self.diag1.is_empty() && self.diag2.is_empty()
    }
}

fn down_diagonal(row: usize, col: usize) -> isize {
    row as isize - col as isize
}

/// Occupied lines for the bitmask solver, relative to the current row.
///
/// Bit `c` set means column `c` is attacked on this row. `diag1` moves one
/// column toward the high bits per row, `diag2` toward the low bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Masks {
    pub cols: u64,
    pub diag1: u64,
    pub diag2: u64,
}

impl Masks {
    /// Columns still legal on this row for a board of width `full` (all ones).
    pub fn available(&self, full: u64) -> u64 {
        full & !(self.cols | self.diag1 | self.diag2)
    }

    /// State for the next row after placing the single-bit `bit`.
    pub fn advance(&self, bit: u64) -> Self {
        Self {
            cols: self.cols | bit,
            diag1: (self.diag1 | bit) << 1,
            diag2: (self.diag2 | bit) >> 1,
        }
    }
}

/// All-ones mask covering columns `0..n`.
pub fn full_mask(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Check a serialized board: square, one queen per row and column, and no two
/// queens on a shared diagonal.
pub fn is_valid_solution<S: AsRef<str>>(rows: &[S]) -> bool {
    let n = rows.len();
    if n == 0 {
        return false;
    }

    let mut queens = Vec::with_capacity(n);
    for (row, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        if line.chars().count() != n || line.chars().any(|c| c != QUEEN && c != EMPTY) {
            return false;
        }
        let mut cols = line.chars().enumerate().filter(|(_, c)| *c == QUEEN);
        match (cols.next(), cols.next()) {
            (Some((col, _)), None) => queens.push((row, col)),
            _ => return false,
        }
    }

    let mut sets = ConflictSets::new();
    for (row, col) in queens {
        if !sets.is_safe(row, col) {
            return false;
        }
        sets.occupy(row, col);
    }
    true
}
