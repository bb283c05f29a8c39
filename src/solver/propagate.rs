use std::collections::BTreeSet;

use log::trace;

use crate::model::Grid;

use super::support::{Combo, EquationSupport};

/// The working state of one search branch: per-cell candidate sets and the
/// surviving combos of every equation.
///
/// Branches snapshot this wholesale (`Clone`) before mutating; siblings must
/// never observe each other's in-progress narrowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateState {
    /// Indexed by flattened cell position.
    pub cells: Vec<BTreeSet<u32>>,
    /// Indexed by equation slot: rows 0..n, then columns.
    pub combos: Vec<Vec<Combo>>,
}

/// Outcome of running the propagator to quiescence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// No further shrinkage possible; every cell kept at least one value.
    Fixpoint,
    /// Some cell lost its last candidate: this branch is infeasible.
    Contradiction,
}

impl CandidateState {
    /// Seed from freshly generated supports: each cell starts as the
    /// intersection of its row's and its column's per-position candidates.
    pub(crate) fn from_supports(grid: &Grid, supports: Vec<EquationSupport>) -> Self {
        let n = grid.dimension();
        let mut cells = Vec::with_capacity(grid.cell_count());
        for index in 0..grid.cell_count() {
            let (row, col) = (index / n, index % n);
            let from_row = &supports[row].position_candidates[col];
            let from_col = &supports[n + col].position_candidates[row];
            cells.push(from_row.intersection(from_col).copied().collect());
        }
        let combos = supports.into_iter().map(|support| support.combos).collect();
        CandidateState { cells, combos }
    }

    pub fn is_fully_determined(&self) -> bool {
        self.cells.iter().all(|candidates| candidates.len() == 1)
    }

    /// For a fully determined state: do the singletons cover 1..=n² exactly
    /// once each?
    pub(crate) fn covers_domain(&self) -> bool {
        let chosen: BTreeSet<u32> = self
            .cells
            .iter()
            .filter_map(|candidates| candidates.first().copied())
            .collect();
        chosen == (1..=self.cells.len() as u32).collect()
    }
}

fn is_doable(combo: &[u32], positions: &[usize], cells: &[BTreeSet<u32>]) -> bool {
    combo
        .iter()
        .zip(positions)
        .all(|(value, &index)| cells[index].contains(value))
}

/// Shrink candidate sets to a fixpoint.
///
/// Each pass filters every equation's combos against the current cell
/// candidates, rebuilds per-position unions, and intersects the row and
/// column unions at every cell. Candidate sets only ever shrink, so the loop
/// terminates; an emptied cell short-circuits immediately.
pub fn propagate(grid: &Grid, state: &mut CandidateState) -> Propagation {
    let n = grid.dimension();
    let mut pass = 0usize;
    loop {
        pass += 1;
        // Phase 1: drop undoable combos, collect per-position unions.
        let mut unions: Vec<Vec<BTreeSet<u32>>> = Vec::with_capacity(grid.equations().len());
        for (slot, equation) in grid.equations().iter().enumerate() {
            let positions = equation.positions();
            let cells = &state.cells;
            state.combos[slot].retain(|combo| is_doable(combo, positions, cells));
            let mut per_position = vec![BTreeSet::new(); positions.len()];
            for combo in &state.combos[slot] {
                for (offset, &value) in combo.iter().enumerate() {
                    per_position[offset].insert(value);
                }
            }
            unions.push(per_position);
        }
        // Phase 2: every cell becomes row-union ∩ column-union.
        let mut changed = false;
        for index in 0..state.cells.len() {
            let (row, col) = (index / n, index % n);
            let narrowed: BTreeSet<u32> = unions[row][col]
                .intersection(&unions[n + col][row])
                .copied()
                .collect();
            if narrowed.is_empty() {
                trace!(target: "propagate", "pass {}: cell {} emptied", pass, index);
                return Propagation::Contradiction;
            }
            if narrowed != state.cells[index] {
                debug_assert!(narrowed.is_subset(&state.cells[index]));
                state.cells[index] = narrowed;
                changed = true;
            }
        }
        trace!(target: "propagate", "pass {} complete, changed={}", pass, changed);
        if !changed {
            return Propagation::Fixpoint;
        }
    }
}
