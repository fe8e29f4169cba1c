//! Laser Puzzle Solver Library
//!
//! Finds where to put a set of movable mirrors, opaque blocks and
//! half-mirrors on a board so that the board's lasers hit every target.
//!
//! The pieces, leaves first: [`board`] holds the puzzle, [`optics`] maps a
//! block and an incoming beam to outgoing beams, [`tracer`] runs every beam
//! across a grid, [`enumerate`] lists candidate placements and [`solver`]
//! ties them together.

pub mod bff;
pub mod board;
pub mod enumerate;
pub mod error;
pub mod grid;
pub mod logging;
pub mod optics;
pub mod persistence;
pub mod solver;
pub mod tracer;

use std::path::Path;

pub use board::{BlockKind, Board, Cell, CellCoord, Direction, Inventory, Laser, Point};
pub use error::{BoardError, Error, Result};
pub use solver::{solve, Outcome, Solution, SolverConfig};

/// Loads a board file and searches it.
pub fn solve_file(path: &Path, config: &SolverConfig) -> Result<(Board, Outcome)> {
    let board = bff::load(path)?;
    let outcome = solve(&board, config);
    Ok((board, outcome))
}
