// crates/core/src/bin/nqueens.rs
//! Local N-Queens solver.
//!
//! Runs a search in-process and prints the result, optionally streaming
//! every placement/removal step the way the visualizer consumes them.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nqueens_core::{
    is_valid_solution, solve, Algorithm, NoopObserver, Progress, SolveMode, SolveObserver,
    SolveParams, StepEvent, MAX_SUPPORTED_N,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nqueens", version, about = "Solve N-Queens locally")]
struct Args {
    /// Board size.
    #[arg(short, long)]
    n: usize,

    /// Search strategy: backtracking or bitmask.
    #[arg(short, long, default_value = "bitmask")]
    algorithm: Algorithm,

    /// findFirst, findAll or countAll.
    #[arg(short, long, default_value = "findAll")]
    mode: SolveMode,

    /// Print every step event.
    #[arg(long)]
    trace: bool,

    /// Number of boards to print.
    #[arg(long, default_value_t = 3)]
    limit: usize,

    /// Check every returned board.
    #[arg(long)]
    verify: bool,

    /// Count with both algorithms and compare their work.
    #[arg(long)]
    compare: bool,

    #[arg(short, long)]
    verbose: bool,
}

/// Spinner for progress events, stdout for step events.
struct CliObserver {
    spinner: ProgressBar,
    trace: bool,
}

impl SolveObserver for CliObserver {
    fn on_progress(&mut self, progress: Progress) {
        self.spinner.set_message(format!(
            "{} solutions, {} operations",
            progress.solutions_found, progress.operations
        ));
    }

    fn on_step(&mut self, step: StepEvent) {
        let line = match step {
            StepEvent::Place { row, col, operations, masks } => match masks {
                Some(m) => format!(
                    "place  ({row},{col}) ops={operations} cols={:b} d1={:b} d2={:b}",
                    m.cols, m.diag1, m.diag2
                ),
                None => format!("place  ({row},{col}) ops={operations}"),
            },
            StepEvent::Remove { row, col, operations, .. } => {
                format!("remove ({row},{col}) ops={operations}")
            }
            StepEvent::Solution { solution_count, operations } => {
                format!("solution #{solution_count} ops={operations}")
            }
        };
        self.spinner.suspend(|| println!("{line}"));
    }

    fn wants_steps(&self) -> bool {
        self.trace
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} Solving {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn compare(n: usize) -> Result<()> {
    println!("{:<14} {:>12} {:>16} {:>10}", "algorithm", "solutions", "operations", "time");
    for algorithm in Algorithm::ALL {
        let start = Instant::now();
        let outcome = solve(SolveParams::new(n, algorithm, SolveMode::CountAll), &mut NoopObserver)?;
        println!(
            "{:<14} {:>12} {:>16} {:>10.1?}",
            algorithm,
            outcome.solution_count,
            outcome.operations,
            start.elapsed()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let params = SolveParams::new(args.n, args.algorithm, args.mode);
    params.validate(MAX_SUPPORTED_N)?;

    if args.compare {
        return compare(args.n);
    }

    let mut observer = CliObserver {
        spinner: spinner(),
        trace: args.trace,
    };
    let start = Instant::now();
    let outcome = solve(params, &mut observer)?;
    let elapsed = start.elapsed();
    observer.spinner.finish_and_clear();

    println!(
        "n={} algorithm={} mode={}: {} solution(s), {} operations in {:.1?}",
        params.n, params.algorithm, params.mode, outcome.solution_count, outcome.operations, elapsed
    );

    if let Some(solutions) = &outcome.solutions {
        if args.verify {
            if let Some(bad) = solutions.iter().position(|b| !is_valid_solution(b)) {
                bail!("solution #{} failed verification", bad + 1);
            }
            println!("all {} board(s) verified", solutions.len());
        }

        for (i, board) in solutions.iter().take(args.limit).enumerate() {
            println!("\n#{}", i + 1);
            for row in board {
                println!("  {row}");
            }
        }
        if solutions.len() > args.limit {
            println!("\n... {} more", solutions.len() - args.limit);
        }
    }

    Ok(())
}
