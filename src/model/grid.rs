use std::collections::BTreeMap;

use crate::error::Error;
use crate::model::equation::Equation;
use crate::model::operator::DivisionPolicy;

/// An n×n arithmetic square: n² cells (0 = empty) and 2n equations, the
/// first n over rows, the next n over columns, in matching order.
///
/// Equations are fixed at construction; only cell values change afterwards.
/// A fully assigned grid must hold each of 1..n² exactly once.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Grid {
    dimension: usize,
    cells: Vec<u32>,
    equations: Vec<Equation>,
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for row in 0..self.dimension {
            for col in 0..self.dimension {
                match self.value(row, col) {
                    0 => write!(f, "   .")?,
                    v => write!(f, "{:4}", v)?,
                }
            }
            writeln!(f, "   = {}", self.equations[row])?;
        }
        write!(f, "cols:")?;
        for col in 0..self.dimension {
            write!(f, " {}", self.equations[self.dimension + col])?;
        }
        writeln!(f)
    }
}

impl Grid {
    /// Build an empty grid from the textual equation encodings: exactly 2n
    /// specs, rows first, then columns. `dimension` must be at least 1.
    pub fn new<S: AsRef<str>>(dimension: usize, specs: &[S]) -> Result<Self, Error> {
        debug_assert!(dimension >= 1);
        let expected = 2 * dimension;
        if specs.len() != expected {
            return Err(Error::EquationCountMismatch {
                dimension,
                expected,
                found: specs.len(),
            });
        }
        let mut equations = Vec::with_capacity(expected);
        for (slot, spec) in specs.iter().enumerate() {
            let positions = if slot < dimension {
                // Row: contiguous run of flattened indices.
                (slot * dimension..(slot + 1) * dimension).collect()
            } else {
                // Column: stride n starting at the column index.
                let col = slot - dimension;
                (0..dimension).map(|row| row * dimension + col).collect()
            };
            equations.push(Equation::parse(spec.as_ref(), dimension, positions)?);
        }
        Ok(Grid {
            dimension,
            cells: vec![0; dimension * dimension],
            equations,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of cells, which is also the top of the value domain 1..=n².
    pub fn cell_count(&self) -> usize {
        self.dimension * self.dimension
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn value(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.dimension + col]
    }

    pub fn value_at(&self, index: usize) -> u32 {
        self.cells[index]
    }

    /// Assign a cell by flattened index; 0 clears it.
    pub fn set_value_at(&mut self, index: usize, value: u32) {
        self.cells[index] = value;
    }

    /// The structured view the printer collaborator consumes:
    /// (row, col) → value, 0 meaning unassigned.
    pub fn cell_values(&self) -> BTreeMap<(usize, usize), u32> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, &value)| ((index / self.dimension, index % self.dimension), value))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&value| value != 0)
    }

    pub(crate) fn equation_values(&self, equation: &Equation) -> Vec<u32> {
        equation
            .positions()
            .iter()
            .map(|&index| self.cells[index])
            .collect()
    }

    pub(crate) fn equation_satisfied(&self, slot: usize, policy: DivisionPolicy) -> bool {
        let equation = &self.equations[slot];
        equation.is_satisfied_by(&self.equation_values(equation), policy)
    }

    /// Full verification: every cell assigned, values a permutation of
    /// 1..=n², and all 2n equations satisfied.
    pub fn satisfies_all_equations(&self, policy: DivisionPolicy) -> bool {
        let limit = self.cell_count() as u32;
        let mut seen = vec![false; self.cell_count()];
        for &value in &self.cells {
            if value == 0 || value > limit || seen[(value - 1) as usize] {
                return false;
            }
            seen[(value - 1) as usize] = true;
        }
        (0..self.equations.len()).all(|slot| self.equation_satisfied(slot, policy))
    }
}
