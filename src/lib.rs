//! Constraint-propagation solver for arithmetic squares: n×n grids filled
//! with 1..n² so that every row and column, read strictly left-to-right with
//! no operator precedence, hits its target.
//!
//! The pipeline: parse equations into a [`model::Grid`], enumerate each
//! equation's valid combos once, shrink per-cell candidate sets to a
//! cross-equation fixpoint, then backtrack row by row with re-propagation
//! after every tentative assignment. [`solver::explore_masks`] wraps the
//! whole pipeline once per distinct assignment of known targets to slots.
//!
//! Prompting, input dialogue, and grid rendering live in consumers of this
//! crate; the solver only exposes structured results.

pub mod error;
pub mod model;
pub mod solver;

pub use error::Error;
