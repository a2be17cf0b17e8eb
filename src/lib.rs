//! tinygo-solver: exhaustive solving of tiny Go boards.
//!
//! This crate builds the complete game graph of a small board, merging
//! positions that are equal up to board symmetry, and settles every node by
//! backward induction. Repeated positions are tracked as ko cycles and kept
//! provisional until the cycle they belong to is fully explored.
//!
//! ## Modules
//!
//! - [`settings`] - Board size and komi
//! - [`board`] - Stone placement, captures, eyes and territory
//! - [`transform`] - Board symmetries and colour swap
//! - [`pool`] - Sorted table of canonical configurations
//! - [`graph`] - Nodes, links and their arena
//! - [`ko`] - Repetition detection and ko-cycle bookkeeping
//! - [`solver`] - The search itself
//! - [`sgf`] - Game record export
//!
//! ## Example
//!
//! ```
//! use tinygo_solver::settings::Settings;
//! use tinygo_solver::solver::{Outcome, Solver};
//!
//! let settings = Settings::new(1, 1, 0).unwrap();
//! let mut solver = Solver::new(settings, 1);
//! assert_eq!(solver.solve_root(), Outcome::Solved);
//! assert_eq!(solver.winner(solver.root()), None);
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod graph;
pub mod ko;
pub mod pool;
pub mod settings;
pub mod sgf;
pub mod solver;
pub mod transform;
