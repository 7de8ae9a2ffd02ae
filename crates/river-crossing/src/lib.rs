//! Solver library for the police, thief and family river crossing puzzle.
//!
//! The puzzle is modelled as a small state graph: a [`State`] records who
//! stands on which bank and where the boat is, [`moves`] enumerates the
//! legal crossings, and [`Solver`] runs breadth-first, depth-first or
//! depth-limited search over it. A [`SearchResult`] carries the solution
//! path together with every explored state so a front end can replay
//! either one.

pub mod error;
pub mod moves;
pub mod puzzle;
pub mod rules;
pub mod solver;
pub mod state;

// Re-export main types
pub use error::{ConfigIssue, PuzzleError, Result};
pub use moves::{apply, generate_successors, legal_moves, transitions, Move, Transition};
pub use puzzle::{Person, PuzzleConfig, Role, SafetyRule, Side};
pub use rules::{is_safe, is_state_safe};
pub use solver::{solve, Algorithm, SearchOutcome, SearchResult, SearchStats, Solver};
pub use state::{Bank, State};
