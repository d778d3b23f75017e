use std::fmt;

use derive_more::{Display, Error, IsVariant};
use nalgebra::{DVector, Scalar};

#[derive(Debug, Clone, PartialEq)]
pub struct Solution<T: Scalar> {
    /// Values of the decision variables, slack variables excluded.
    pub vars: DVector<T>,
    pub fn_val: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, IsVariant)]
pub enum SolutionError {
    #[display(fmt = "the objective function is unbounded")]
    Unbounded,
    #[display(fmt = "no optimum was reached after {} iterations", iterations)]
    NonConvergent { iterations: usize },
    #[display(fmt = "constraint {} leaves no strictly interior starting point", row)]
    NoInteriorPoint { row: usize },
    #[display(fmt = "the scaled constraint matrix is singular")]
    SingularProjection,
}

pub type SolutionResult<T> = Result<Solution<T>, SolutionError>;

impl<T: Scalar + fmt::Display> fmt::Display for Solution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.vars.iter().enumerate() {
            writeln!(f, "x{} = {value}", i + 1)?;
        }
        write!(f, "f = {}", self.fn_val)
    }
}
