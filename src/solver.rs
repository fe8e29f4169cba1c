//! Placement search.
//!
//! Pulls candidate placements from the enumerator, applies each to a fresh
//! copy of the board's grid, traces every laser and stops at the first
//! placement whose beams cover all targets. Each candidate is evaluated
//! independently, so the parallel strategy only shares the "found" signal
//! that rayon's `find_map_any` provides.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::board::Board;
use crate::enumerate::{self, placements, Placement};
use crate::grid::Grid;
use crate::tracer::{Trace, Tracer};

/// Search settings.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverConfig {
    /// Evaluate placements on the rayon thread pool.
    pub parallel: bool,
    /// Per-beam iteration cap override; `None` uses the tracer default.
    pub step_cap: Option<usize>,
}

/// A satisfying placement together with its grid and traced beams.
#[derive(Clone, Debug)]
pub struct Solution {
    pub placement: Placement,
    pub grid: Grid,
    pub trace: Trace,
}

/// Result of a search. Running out of placements is a normal outcome.
#[derive(Clone, Debug)]
pub enum Outcome {
    Solved(Solution),
    NoSolution {
        /// Placements traced before giving up.
        evaluated: u64,
    },
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Solved(solution) => Some(solution),
            Self::NoSolution { .. } => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            Self::Solved(solution) => Some(solution),
            Self::NoSolution { .. } => None,
        }
    }
}

/// Applies one placement and traces it; returns the solution if every target is hit.
#[inline]
fn evaluate(board: &Board, tracer: &Tracer<'_>, placement: Placement) -> Option<Solution> {
    let grid = board.grid().with_placement(&placement);
    let trace = tracer.run(&grid);
    trace.all_targets_hit.then(|| Solution {
        placement,
        grid,
        trace,
    })
}

/// Finds the first placement that lights every target.
///
/// First found, not best found. With an empty inventory the board is traced
/// once as given.
pub fn solve(board: &Board, config: &SolverConfig) -> Outcome {
    let tracer = Tracer::for_board(board, config.step_cap);
    let candidates = enumerate::count(board.open_cells().len(), &board.inventory());
    info!(
        "searching {candidates} placements of {} blocks over {} open cells ({})",
        board.inventory().total(),
        board.open_cells().len(),
        if config.parallel { "parallel" } else { "sequential" }
    );
    debug!("step cap {} per beam", tracer.step_cap());

    let started = Instant::now();
    let (outcome, evaluated) = if config.parallel {
        solve_parallel(board, &tracer)
    } else {
        solve_sequential(board, &tracer)
    };

    let elapsed = started.elapsed();
    match &outcome {
        Outcome::Solved(_) => info!("solved after {evaluated} placements in {elapsed:?}"),
        Outcome::NoSolution { .. } => {
            info!("no solution after {evaluated} placements in {elapsed:?}")
        }
    }
    outcome
}

fn solve_sequential(board: &Board, tracer: &Tracer<'_>) -> (Outcome, u64) {
    let mut evaluated = 0u64;
    for placement in placements(board.open_cells(), &board.inventory()) {
        evaluated += 1;
        if let Some(solution) = evaluate(board, tracer, placement) {
            return (Outcome::Solved(solution), evaluated);
        }
    }
    (Outcome::NoSolution { evaluated }, evaluated)
}

fn solve_parallel(board: &Board, tracer: &Tracer<'_>) -> (Outcome, u64) {
    let evaluated = AtomicU64::new(0);
    let found = placements(board.open_cells(), &board.inventory())
        .par_bridge()
        .find_map_any(|placement| {
            evaluated.fetch_add(1, Ordering::Relaxed);
            evaluate(board, tracer, placement)
        });

    let evaluated = evaluated.into_inner();
    match found {
        Some(solution) => (Outcome::Solved(solution), evaluated),
        None => (Outcome::NoSolution { evaluated }, evaluated),
    }
}
