mod equation;
mod grid;
mod operator;

pub use equation::Equation;
pub use grid::Grid;
pub use operator::{DivisionPolicy, Operator};
