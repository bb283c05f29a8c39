use std::collections::BTreeSet;

use itertools::Itertools;
use log::trace;

use crate::model::{DivisionPolicy, Equation, Grid};

use super::search::SearchBudget;

/// An ordered tuple of distinct values satisfying one equation in isolation.
pub type Combo = Vec<u32>;

/// Everything one equation contributes before cross-equation filtering: its
/// valid combos, and per position the union of values those combos place
/// there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationSupport {
    pub combos: Vec<Combo>,
    pub position_candidates: Vec<BTreeSet<u32>>,
}

impl EquationSupport {
    fn from_combos(dimension: usize, combos: Vec<Combo>) -> Self {
        let mut position_candidates = vec![BTreeSet::new(); dimension];
        for combo in &combos {
            for (position, &value) in combo.iter().enumerate() {
                position_candidates[position].insert(value);
            }
        }
        EquationSupport {
            combos,
            position_candidates,
        }
    }
}

/// Enumerate every ordered tuple of `dimension` distinct values from 1..=n²
/// and keep those satisfying the equation. Runs once per equation up front;
/// propagation then only ever filters the result.
///
/// `None` means the budget deadline expired mid-enumeration.
pub(crate) fn equation_support(
    equation: &Equation,
    dimension: usize,
    policy: DivisionPolicy,
    budget: &SearchBudget,
) -> Option<EquationSupport> {
    let limit = (dimension * dimension) as u32;
    let mut combos = Vec::new();
    for (index, combo) in (1..=limit).permutations(dimension).enumerate() {
        // Deadline check amortised over the combinatorial enumeration.
        if index % 4096 == 0 && budget.deadline_passed() {
            return None;
        }
        if equation.is_satisfied_by(&combo, policy) {
            combos.push(combo);
        }
    }
    trace!(
        target: "support",
        "equation {} keeps {} of {} orderings",
        equation,
        combos.len(),
        (1..=u64::from(limit)).rev().take(dimension).product::<u64>()
    );
    Some(EquationSupport::from_combos(dimension, combos))
}

/// Generate supports for all 2n equations of a grid.
pub(crate) fn grid_supports(
    grid: &Grid,
    policy: DivisionPolicy,
    budget: &SearchBudget,
) -> Option<Vec<EquationSupport>> {
    grid.equations()
        .iter()
        .map(|equation| equation_support(equation, grid.dimension(), policy, budget))
        .collect()
}
