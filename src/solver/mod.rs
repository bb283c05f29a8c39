mod brute_force;
mod mask;
mod propagate;
mod search;
mod support;

pub use brute_force::{brute_force_all, brute_force_first};
pub use mask::{explore_masks, MaskExploration};
pub use propagate::{propagate, CandidateState, Propagation};
pub use search::{solve_all, solve_first, FirstSolution, SearchBudget, SearchOutcome, SolverConfig};
pub use support::{Combo, EquationSupport};
