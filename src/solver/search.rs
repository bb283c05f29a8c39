use std::collections::BTreeSet;
use std::time::Instant;

use log::{debug, trace};

use crate::model::{DivisionPolicy, Grid};

use super::propagate::{propagate, CandidateState, Propagation};
use super::support::grid_supports;

/// Cancellation signal for the combinatorial stages: stop after collecting
/// this many solutions, or once the deadline passes. Checked at every
/// recursive entry and during candidate generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_solutions: Option<usize>,
    pub deadline: Option<Instant>,
}

impl SearchBudget {
    pub(crate) fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub(crate) fn solutions_full(&self, collected: usize) -> bool {
        self.max_solutions.is_some_and(|max| collected >= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub division: DivisionPolicy,
    pub budget: SearchBudget,
}

/// Result of an enumerate-all search.
///
/// `Complete(vec![])` is an exhaustive proof of unsolvability; `Truncated`
/// means the budget cut the search short and more solutions may exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Complete(Vec<Grid>),
    Truncated(Vec<Grid>),
}

impl SearchOutcome {
    pub fn solutions(&self) -> &[Grid] {
        match self {
            SearchOutcome::Complete(solutions) | SearchOutcome::Truncated(solutions) => solutions,
        }
    }

    pub fn into_solutions(self) -> Vec<Grid> {
        match self {
            SearchOutcome::Complete(solutions) | SearchOutcome::Truncated(solutions) => solutions,
        }
    }

    pub fn is_exhaustive(&self) -> bool {
        matches!(self, SearchOutcome::Complete(_))
    }
}

/// Enumerate every solution of the grid by branch-and-propagate: generate
/// each equation's combos once, shrink to a fixpoint, then fix rows one at a
/// time, re-propagating after each tentative row.
pub fn solve_all(grid: &Grid, config: &SolverConfig) -> SearchOutcome {
    let Some(supports) = grid_supports(grid, config.division, &config.budget) else {
        debug!(target: "search", "candidate generation hit the deadline");
        return SearchOutcome::Truncated(Vec::new());
    };
    let mut state = CandidateState::from_supports(grid, supports);
    if propagate(grid, &mut state) == Propagation::Contradiction {
        debug!(target: "search", "contradiction before any branching");
        return SearchOutcome::Complete(Vec::new());
    }
    let mut solutions = Vec::new();
    let mut truncated = false;
    if state.is_fully_determined() {
        // Propagation alone settled every cell; nothing to branch over.
        if state.covers_domain() {
            solutions.push(extract_solution(grid, &state));
        }
        return SearchOutcome::Complete(solutions);
    }
    branch(grid, 0, &state, config, &mut solutions, &mut truncated);
    debug!(
        target: "search",
        "search finished with {} solutions (truncated: {})",
        solutions.len(),
        truncated
    );
    if truncated {
        SearchOutcome::Truncated(solutions)
    } else {
        SearchOutcome::Complete(solutions)
    }
}

/// Result of a stop-at-first search: a solution, an exhaustive proof that
/// none exists, or a budget cut before either was established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstSolution {
    Found(Grid),
    Unsolvable,
    Truncated,
}

impl FirstSolution {
    pub fn into_solution(self) -> Option<Grid> {
        match self {
            FirstSolution::Found(solution) => Some(solution),
            FirstSolution::Unsolvable | FirstSolution::Truncated => None,
        }
    }
}

/// Stop-at-first-solution mode. An exhausted search with no yield reports
/// [`FirstSolution::Unsolvable`]; hitting the deadline before any solution
/// reports [`FirstSolution::Truncated`] instead.
pub fn solve_first(grid: &Grid, config: &SolverConfig) -> FirstSolution {
    let mut limited = *config;
    limited.budget.max_solutions = Some(1);
    let outcome = solve_all(grid, &limited);
    let exhaustive = outcome.is_exhaustive();
    match outcome.into_solutions().into_iter().next() {
        Some(solution) => FirstSolution::Found(solution),
        None if exhaustive => FirstSolution::Unsolvable,
        None => FirstSolution::Truncated,
    }
}

fn branch(
    grid: &Grid,
    depth: usize,
    state: &CandidateState,
    config: &SolverConfig,
    solutions: &mut Vec<Grid>,
    truncated: &mut bool,
) {
    if config.budget.deadline_passed() || config.budget.solutions_full(solutions.len()) {
        *truncated = true;
        return;
    }
    let n = grid.dimension();
    if depth == n {
        // Every row fixed; normally the singleton check below has already
        // yielded before we get here.
        if state.is_fully_determined() && state.covers_domain() {
            solutions.push(extract_solution(grid, state));
        }
        return;
    }
    for combo in &state.combos[depth] {
        if config.budget.deadline_passed() || config.budget.solutions_full(solutions.len()) {
            *truncated = true;
            return;
        }
        trace!(target: "search", "depth {}: trying row combo {:?}", depth, combo);
        // Independent snapshot: sibling branches must not see our narrowing.
        let mut tentative = state.clone();
        for (offset, &value) in combo.iter().enumerate() {
            tentative.cells[depth * n + offset] = BTreeSet::from([value]);
        }
        // The used values are spent for every cell in later rows.
        let mut emptied = false;
        for index in (depth + 1) * n..grid.cell_count() {
            for value in combo {
                tentative.cells[index].remove(value);
            }
            if tentative.cells[index].is_empty() {
                emptied = true;
                break;
            }
        }
        if emptied {
            continue;
        }
        if propagate(grid, &mut tentative) == Propagation::Contradiction {
            continue;
        }
        if tentative.is_fully_determined() {
            if tentative.covers_domain() {
                solutions.push(extract_solution(grid, &tentative));
            }
            continue;
        }
        branch(grid, depth + 1, &tentative, config, solutions, truncated);
        if *truncated {
            return;
        }
    }
}

fn extract_solution(grid: &Grid, state: &CandidateState) -> Grid {
    let mut solved = grid.clone();
    for (index, candidates) in state.cells.iter().enumerate() {
        solved.set_value_at(index, candidates.first().copied().unwrap_or(0));
    }
    solved
}
