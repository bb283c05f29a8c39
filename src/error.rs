//! Validation errors raised while constructing puzzles.
//!
//! Solver dead-ends are not errors: a contradiction during propagation or an
//! exhausted search is reported as an ordinary empty result. Only malformed
//! input reaches this type.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A grid of side `dimension` needs one equation per row and per column.
    #[error("a {dimension}x{dimension} grid needs {expected} equations, found {found}")]
    EquationCountMismatch {
        dimension: usize,
        expected: usize,
        found: usize,
    },

    /// An operator character outside `+ - * /`.
    #[error("unsupported operation '{0}'")]
    UnsupportedOperation(char),

    /// The tail of an equation spec did not parse as an integer target.
    #[error("equation {0:?} has no valid integer target")]
    InvalidTarget(String),

    /// The mask explorer was given mismatched template and target counts.
    #[error("{templates} operator templates cannot take {targets} targets")]
    TemplateTargetMismatch { templates: usize, targets: usize },
}
