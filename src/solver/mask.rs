use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::debug;

use crate::error::Error;
use crate::model::Grid;

use super::search::{solve_all, SearchOutcome, SolverConfig};

/// Which arrangements of a known multiset of targets into the 2n equation
/// slots make the puzzle solvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskExploration {
    /// Each solvable target assignment (ordered per slot: rows first, then
    /// columns) mapped to every solution of the resulting square.
    pub assignments: BTreeMap<Vec<i64>, Vec<Grid>>,
    /// True if any inner search hit the budget; absent assignments are then
    /// not necessarily unsolvable.
    pub truncated: bool,
}

/// Try every distinct assignment of `targets` to the operator `templates`
/// (rows first, then columns; a template is an equation spec without its
/// target) and collect the assignments admitting at least one solution.
///
/// Duplicate targets never produce duplicate assignments.
pub fn explore_masks<S: AsRef<str>>(
    templates: &[S],
    targets: &[i64],
    config: &SolverConfig,
) -> Result<MaskExploration, Error> {
    if templates.len() != targets.len() {
        return Err(Error::TemplateTargetMismatch {
            templates: templates.len(),
            targets: targets.len(),
        });
    }
    if targets.is_empty() {
        return Ok(MaskExploration {
            assignments: BTreeMap::new(),
            truncated: false,
        });
    }
    let dimension = targets.len() / 2;
    let distinct: BTreeSet<Vec<i64>> = targets
        .iter()
        .copied()
        .permutations(targets.len())
        .collect();
    debug!(
        target: "mask",
        "exploring {} distinct assignments of {:?}",
        distinct.len(),
        targets
    );
    let mut assignments = BTreeMap::new();
    let mut truncated = false;
    for mask in distinct {
        let specs: Vec<String> = templates
            .iter()
            .zip(&mask)
            .map(|(template, target)| format!("{}{}", template.as_ref(), target))
            .collect();
        let grid = Grid::new(dimension, &specs)?;
        let outcome = solve_all(&grid, config);
        if !outcome.is_exhaustive() {
            truncated = true;
        }
        let solutions = outcome.into_solutions();
        if !solutions.is_empty() {
            debug!(target: "mask", "{:?} admits {} solutions", mask, solutions.len());
            assignments.insert(mask, solutions);
        }
    }
    Ok(MaskExploration {
        assignments,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use super::*;
    use crate::model::DivisionPolicy;
    use crate::solver::brute_force::brute_force_all;
    use crate::tests::UsingLogger;

    #[test_context(UsingLogger)]
    #[test]
    fn test_mismatched_template_and_target_counts_fail(_: &mut UsingLogger) {
        let result = explore_masks(&["+", "+", "+"], &[6, 4], &SolverConfig::default());
        assert_eq!(
            result,
            Err(Error::TemplateTargetMismatch {
                templates: 3,
                targets: 2,
            })
        );
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_odd_slot_count_fails_grid_validation(_: &mut UsingLogger) {
        let result = explore_masks(&["+", "+", "+"], &[6, 4, 5], &SolverConfig::default());
        assert_eq!(
            result,
            Err(Error::EquationCountMismatch {
                dimension: 1,
                expected: 2,
                found: 3,
            })
        );
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_small_square_masks_match_direct_search(_: &mut UsingLogger) {
        // Targets {6, 4, 5, 5} over all-addition 2x2 templates.
        let exploration = explore_masks(
            &["+", "+", "+", "+"],
            &[6, 4, 5, 5],
            &SolverConfig::default(),
        )
        .unwrap();
        assert!(!exploration.truncated);
        // The known-good arrangement is present with its two solutions.
        let known = exploration.assignments.get(&vec![6, 4, 5, 5]).unwrap();
        assert_eq!(known.len(), 2);
        // Duplicate targets collapse: every key is unique by construction,
        // and each is a permutation of the input multiset.
        for (mask, solutions) in &exploration.assignments {
            let mut sorted = mask.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![4, 5, 5, 6]);
            assert!(!solutions.is_empty());
            let grid_specs: Vec<String> = ["+", "+", "+", "+"]
                .iter()
                .zip(mask)
                .map(|(template, target)| format!("{}{}", template, target))
                .collect();
            let grid = Grid::new(2, &grid_specs).unwrap();
            let brute = brute_force_all(&grid, DivisionPolicy::default());
            assert_eq!(solutions.len(), brute.len());
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_absent_assignments_are_genuinely_unsolvable(_: &mut UsingLogger) {
        let templates = ["+", "+", "+", "+"];
        let targets = [6, 4, 5, 5];
        let exploration = explore_masks(&templates, &targets, &SolverConfig::default()).unwrap();
        assert!(!exploration.truncated);
        let all_masks: BTreeSet<Vec<i64>> = targets
            .iter()
            .copied()
            .permutations(targets.len())
            .collect();
        // Some arrangements (e.g. rows 6,5) cannot split 1+2+3+4 and must
        // be absent from the report.
        assert!(exploration.assignments.len() < all_masks.len());
        for mask in all_masks {
            if exploration.assignments.contains_key(&mask) {
                continue;
            }
            let specs: Vec<String> = templates
                .iter()
                .zip(&mask)
                .map(|(template, target)| format!("{}{}", template, target))
                .collect();
            let grid = Grid::new(2, &specs).unwrap();
            assert!(
                brute_force_all(&grid, DivisionPolicy::default()).is_empty(),
                "mask {:?} was omitted but is solvable",
                mask
            );
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_product_heavy_masks_verify_independently(_: &mut UsingLogger) {
        let templates = ["**", "*+", "++", "++", "**", "*-"];
        let targets = [18, 18, 18, 18, 20, 20];
        let exploration = explore_masks(&templates, &targets, &SolverConfig::default()).unwrap();
        assert!(!exploration.truncated);
        for (mask, solutions) in &exploration.assignments {
            assert!(!solutions.is_empty(), "empty assignments must be omitted");
            for solution in solutions {
                assert!(
                    solution.satisfies_all_equations(DivisionPolicy::default()),
                    "mask {:?} yielded an invalid grid",
                    mask
                );
            }
        }
    }
}
