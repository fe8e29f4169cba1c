//! Error types for board loading and validation.

use thiserror::Error;

use crate::board::Point;

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a board is rejected before any search begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("laser origin ({}, {}) is outside the board", .origin.x, .origin.y)]
    LaserOutOfBounds { origin: Point },

    #[error("laser origin ({}, {}) is not on a cell boundary midpoint", .origin.x, .origin.y)]
    LaserNotOnBoundary { origin: Point },

    #[error("laser direction ({dx}, {dy}) is not a diagonal unit step")]
    InvalidDirection { dx: i32, dy: i32 },

    #[error("target ({}, {}) is outside the board", .target.x, .target.y)]
    TargetOutOfBounds { target: Point },

    #[error("inventory count for block '{letter}' is negative ({count})")]
    NegativeInventory { letter: char, count: i64 },

    #[error("{needed} movable blocks but only {available} open cells")]
    InsufficientOpenCells { needed: usize, available: usize },
}

/// Errors surfaced while loading a board file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("malformed board: {0}")]
    MalformedBoard(#[from] BoardError),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
