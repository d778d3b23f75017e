use std::fmt;

use derive_new::new;
use nalgebra::{RowDVector, Scalar};

use crate::{ensure_eq, InputError, InputResult, Number};

use super::{SimplexTable, SolutionResult, SolverSettings};

#[derive(Debug, Clone, PartialEq, new)]
pub struct ObjectiveFunction<T: Scalar> {
    pub(crate) coefficients: RowDVector<T>,
}

/// `coefficients · x <= rhs`
#[derive(Debug, Clone, PartialEq, new)]
pub struct Constraint<T: Scalar> {
    pub(crate) coefficients: RowDVector<T>,
    pub(crate) rhs: T,
}

/// Maximization problem before slack variables are added.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem<T: Scalar> {
    pub(crate) objective_function: ObjectiveFunction<T>,
    pub(crate) constraints: Vec<Constraint<T>>,
}

impl<T: Number> Problem<T> {
    pub fn new(
        objective_function: ObjectiveFunction<T>,
        constraints: Vec<Constraint<T>>,
    ) -> InputResult<Self> {
        let n_variables = objective_function.coefficients.len();
        if n_variables == 0 {
            return Err(InputError::NoVariables);
        }
        if constraints.is_empty() {
            return Err(InputError::NotEnoughResults {
                expected: 1,
                found: 0,
            });
        }
        for (i, constraint) in constraints.iter().enumerate() {
            ensure_eq!(
                constraint.coefficients.len(),
                n_variables,
                InputError::DimensionMismatch {
                    row: i + 1,
                    expected: n_variables,
                    found: constraint.coefficients.len(),
                }
            );
        }

        Ok(Self {
            objective_function,
            constraints,
        })
    }

    #[inline]
    pub fn n_variables(&self) -> usize {
        self.objective_function.coefficients.len()
    }

    #[inline]
    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn solve(self, settings: SolverSettings<T>) -> SolutionResult<T> {
        SimplexTable::new(self, settings).solve()
    }
}

fn write_linear_form<T: Number>(
    f: &mut fmt::Formatter<'_>,
    coefficients: &RowDVector<T>,
) -> fmt::Result {
    for (i, coefficient) in coefficients.iter().enumerate() {
        let negative = *coefficient < T::zero();
        match (i, negative) {
            (0, false) => {}
            (0, true) => f.write_str("-")?,
            (_, false) => f.write_str(" + ")?,
            (_, true) => f.write_str(" - ")?,
        }
        let magnitude = if negative {
            -coefficient.clone()
        } else {
            coefficient.clone()
        };
        write!(f, "{magnitude}x{}", i + 1)?;
    }
    Ok(())
}

impl<T: Number> fmt::Display for Problem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("f = ")?;
        write_linear_form(f, &self.objective_function.coefficients)?;
        f.write_str(" -> max\nConstraints:")?;
        for constraint in &self.constraints {
            f.write_str("\n    ")?;
            write_linear_form(f, &constraint.coefficients)?;
            write!(f, " <= {}", constraint.rhs)?;
        }
        Ok(())
    }
}
