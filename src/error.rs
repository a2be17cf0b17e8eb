//! Error types for recoverable, caller-facing failures.
//!
//! Broken graph bookkeeping is not represented here: those are bugs and the
//! solver panics with a diagnostic instead.

use thiserror::Error;

/// Invalid startup configuration.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("board side {side} is out of range (expected 1..={max})")]
    SideOutOfRange { side: usize, max: usize },

    #[error("board area {area} exceeds the supported maximum of {max}")]
    AreaTooLarge { area: usize, max: usize },

    #[error("komi {komi} is not a multiple of 0.5")]
    KomiNotHalfInteger { komi: f32 },
}

/// Malformed board diagram.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("diagram has {got} rows, expected {expected}")]
    RowCount { got: usize, expected: usize },

    #[error("row {row} has {got} points, expected {expected}")]
    RowLength {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("unexpected character '{ch}' in row {row}")]
    BadChar { row: usize, ch: char },
}

/// Why a stone cannot be placed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    #[error("point ({x},{y}) is off the board")]
    OutOfRange { x: usize, y: usize },

    #[error("point ({x},{y}) is not empty")]
    Occupied { x: usize, y: usize },

    #[error("stone at ({x},{y}) would have no liberties")]
    NoLiberties { x: usize, y: usize },
}

/// Why a move cannot be added to the search tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayError {
    #[error("illegal move: {0}")]
    Illegal(#[from] PlaceError),

    #[error("move {mv} already has a link from node {node}")]
    AlreadyPlayed { node: usize, mv: String },

    #[error("node {node} is a finished game")]
    GameOver { node: usize },

    #[error("move {mv} cannot be played on the board")]
    NotABoardMove { mv: String },
}
