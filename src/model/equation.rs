use crate::error::Error;
use crate::model::operator::{DivisionPolicy, Operator, Ratio};

/// One row or column constraint: the operators between its cells and the
/// target the left-to-right fold must reach.
///
/// `positions` are the flattened grid indices the equation governs: a row's
/// cells left-to-right, or a column's cells top-to-bottom. There is always
/// exactly one more position than operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Equation {
    operators: Vec<Operator>,
    target: i64,
    positions: Vec<usize>,
}

impl Equation {
    /// Parse the textual encoding: `dimension - 1` operator characters
    /// followed immediately by the decimal target, e.g. `"+-6"` for a
    /// 3-wide row. Targets may be negative (`"--/-1"`).
    pub fn parse(spec: &str, dimension: usize, positions: Vec<usize>) -> Result<Self, Error> {
        debug_assert_eq!(positions.len(), dimension);
        let operator_count = dimension - 1;
        if spec.chars().count() <= operator_count {
            return Err(Error::InvalidTarget(spec.to_string()));
        }
        let mut chars = spec.chars();
        let operators = chars
            .by_ref()
            .take(operator_count)
            .map(Operator::from_char)
            .collect::<Result<Vec<_>, _>>()?;
        let target = chars
            .as_str()
            .parse::<i64>()
            .map_err(|_| Error::InvalidTarget(spec.to_string()))?;
        Ok(Equation {
            operators,
            target,
            positions,
        })
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Fold `values` strictly left-to-right, no operator precedence.
    /// `None` marks an infeasible combo (zero divisor or rejected
    /// intermediate), never an error.
    fn evaluate(&self, values: &[u32], policy: DivisionPolicy) -> Option<Ratio> {
        debug_assert_eq!(values.len(), self.operators.len() + 1);
        let mut acc = Ratio::from_int(i64::from(values[0]));
        for (op, &value) in self.operators.iter().zip(&values[1..]) {
            acc = op.apply(acc, i64::from(value), policy)?;
        }
        Some(acc)
    }

    /// Do these values satisfy the equation? Equality against the target is
    /// exact; an infeasible fold simply fails to satisfy.
    pub fn is_satisfied_by(&self, values: &[u32], policy: DivisionPolicy) -> bool {
        self.evaluate(values, policy)
            .is_some_and(|result| result.equals_int(self.target))
    }
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for op in &self.operators {
            write!(f, "{}", op)?;
        }
        write!(f, "{}", self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(spec: &str, dimension: usize) -> Equation {
        Equation::parse(spec, dimension, (0..dimension).collect()).unwrap()
    }

    #[test]
    fn test_parse_splits_operators_and_target() {
        let eq = row("+-6", 3);
        assert_eq!(eq.operators(), &[Operator::Add, Operator::Sub]);
        assert_eq!(eq.target(), 6);
    }

    #[test]
    fn test_parse_negative_target() {
        let eq = row("--/-1", 4);
        assert_eq!(
            eq.operators(),
            &[Operator::Sub, Operator::Sub, Operator::Div]
        );
        assert_eq!(eq.target(), -1);
    }

    #[test]
    fn test_parse_single_cell_equation_has_no_operators() {
        let eq = row("5", 1);
        assert!(eq.operators().is_empty());
        assert_eq!(eq.target(), 5);
    }

    #[test]
    fn test_parse_rejects_unknown_operator() {
        assert_eq!(
            Equation::parse("x5", 2, vec![0, 1]),
            Err(Error::UnsupportedOperation('x'))
        );
    }

    #[test]
    fn test_parse_rejects_missing_target() {
        assert_eq!(
            Equation::parse("+-", 3, vec![0, 1, 2]),
            Err(Error::InvalidTarget("+-".to_string()))
        );
    }

    #[test]
    fn test_evaluation_is_left_to_right_without_precedence() {
        // 6 + 5 * 3 reads as (6 + 5) * 3 = 33, never 21.
        let eq = row("+*33", 3);
        assert!(eq.is_satisfied_by(&[6, 5, 3], DivisionPolicy::default()));
        let wrong = row("+*21", 3);
        assert!(!wrong.is_satisfied_by(&[6, 5, 3], DivisionPolicy::default()));
    }

    #[test]
    fn test_division_policy_gates_fractional_intermediates() {
        // 1 / 2 * 4 = 2 exactly, but the intermediate 1/2 is fractional.
        let eq = row("/*2", 3);
        assert!(eq.is_satisfied_by(&[1, 2, 4], DivisionPolicy::FractionalIntermediates));
        assert!(!eq.is_satisfied_by(&[1, 2, 4], DivisionPolicy::ExactIntermediates));
        // 9 * 1 / 3 = 3 stays integral throughout, both policies accept.
        let exact = row("*/3", 3);
        assert!(exact.is_satisfied_by(&[9, 1, 3], DivisionPolicy::ExactIntermediates));
    }
}
