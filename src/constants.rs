//! Constants for board limits, solver defaults and stone encoding.
//!
//! Board dimensions are not compile-time constants here: they live in
//! [`Settings`](crate::settings::Settings), which is built once at startup.
//! This module only holds the bounds those settings are checked against.

// =============================================================================
// Board Geometry
// =============================================================================

/// Largest accepted board side.
pub const MAX_SIDE: usize = 19;

/// Largest accepted board area.
///
/// Configurations are keyed by a base-3 number held in a `u128`, and
/// `3^80 < 2^128`, so 80 cells is the hard limit of the encoding.
pub const MAX_AREA: usize = 80;

// =============================================================================
// Solver Parameters
// =============================================================================

/// Seed used for the random move order when none is given.
pub const DEFAULT_SEED: u64 = 0x5eed_0f60;

/// Nodes created between two progress reports.
pub const REPORT_PERIOD: usize = 10_000;

/// Stack size of the solver thread. The search recurses once per move on
/// the current line of play.
pub const SOLVER_STACK_SIZE: usize = 256 * 1024 * 1024;

// =============================================================================
// Stone Encoding
// =============================================================================

/// Base-3 digit of an empty point.
pub const DIGIT_EMPTY: u128 = 0;

/// Base-3 digit of a black stone.
pub const DIGIT_BLACK: u128 = 1;

/// Base-3 digit of a white stone.
pub const DIGIT_WHITE: u128 = 2;

/// Character used for a black stone in diagrams.
pub const CHAR_BLACK: char = 'X';

/// Character used for a white stone in diagrams.
pub const CHAR_WHITE: char = 'O';

/// Character used for an empty point in diagrams.
pub const CHAR_EMPTY: char = '.';
