//! Reference solver: plain permutation backtracking with no candidate sets.
//!
//! Fills cells in flattened order from the pool of unused values, checking a
//! row equation when its last cell fills and a column equation when its last
//! cell fills. Strictly slower than the propagation search but simple enough
//! to verify by eye; the search tests cross-check against it.

use crate::model::{DivisionPolicy, Grid};

/// Every solution, by exhaustive backtracking.
pub fn brute_force_all(grid: &Grid, policy: DivisionPolicy) -> Vec<Grid> {
    let mut working = grid.clone();
    let mut unused: Vec<u32> = (1..=working.cell_count() as u32).collect();
    let mut found = Vec::new();
    fill(&mut working, &mut unused, 0, policy, &mut found, None);
    found
}

/// The first solution found, if any.
pub fn brute_force_first(grid: &Grid, policy: DivisionPolicy) -> Option<Grid> {
    let mut working = grid.clone();
    let mut unused: Vec<u32> = (1..=working.cell_count() as u32).collect();
    let mut found = Vec::new();
    fill(&mut working, &mut unused, 0, policy, &mut found, Some(1));
    found.pop()
}

/// Returns true once the solution limit is hit and unwinding should stop.
fn fill(
    working: &mut Grid,
    unused: &mut Vec<u32>,
    index: usize,
    policy: DivisionPolicy,
    found: &mut Vec<Grid>,
    limit: Option<usize>,
) -> bool {
    if index == working.cell_count() {
        // Each row was checked as its last column filled, each column as its
        // last row filled, and the pool guarantees a permutation.
        found.push(working.clone());
        return limit.is_some_and(|max| found.len() >= max);
    }
    let n = working.dimension();
    let (row, col) = (index / n, index % n);
    for slot in 0..unused.len() {
        let value = unused[slot];
        working.set_value_at(index, value);
        if col == n - 1 && !working.equation_satisfied(row, policy) {
            continue;
        }
        if row == n - 1 && !working.equation_satisfied(n + col, policy) {
            continue;
        }
        unused.remove(slot);
        let stop = fill(working, unused, index + 1, policy, found, limit);
        unused.insert(slot, value);
        if stop {
            return true;
        }
    }
    working.set_value_at(index, 0);
    false
}
