use std::{cmp::Ordering, fmt};

use derive_more::{Display, Error, IsVariant};
use nalgebra::{DMatrix, DVector, RowDVector, Scalar};

use crate::{dbg_display, Number};

use super::{
    PivotRule, Problem, Row, Solution, SolutionError, SolutionResult, SolverSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum Status {
    /// Assembled from a [`Problem`]; the objective row still holds `c`.
    Building,
    Iterating,
    Optimal,
    Unbounded,
    NonConvergent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, IsVariant)]
pub enum PivotError {
    #[display(fmt = "column {} is out of range for {} columns", column, n_columns)]
    ColumnOutOfRange { column: usize, n_columns: usize },
    #[display(fmt = "variable x{} is not basic in any row", "variable + 1")]
    NotBasic { variable: usize },
    #[display(fmt = "zero pivot element in row {}, column {}", row, column)]
    ZeroPivot { row: usize, column: usize },
}

/// Objective row plus one row per `<=` constraint, extended with an identity
/// block of slack columns.
///
/// Columns `0..n_variables` are the decision variables, the rest are slacks.
/// Rows never move: the variable basic in row `i` is `basis[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexTable<T: Scalar> {
    n_variables: usize,
    objective: Row<T>,
    rows: Vec<Row<T>>,
    basis: Vec<usize>,
    settings: SolverSettings<T>,
    iterations: usize,
    status: Status,
}

impl<T: Number> SimplexTable<T> {
    pub fn new(problem: Problem<T>, settings: SolverSettings<T>) -> Self {
        let n_variables = problem.n_variables();
        let n_constraints = problem.n_constraints();
        let n_columns = n_variables + n_constraints;
        let Problem {
            objective_function,
            constraints,
        } = problem;

        let objective = Row::new(
            RowDVector::from_iterator(
                n_columns,
                objective_function
                    .coefficients
                    .iter()
                    .cloned()
                    .chain(std::iter::repeat_with(T::zero).take(n_constraints)),
            ),
            T::zero(),
        );

        let rows = constraints
            .into_iter()
            .enumerate()
            .map(|(i, constraint)| {
                if constraint.rhs.is_negative_within(&settings.epsilon) {
                    log::warn!(
                        "Constraint {} has a negative right-hand side, the slack basis is infeasible",
                        i + 1
                    );
                }
                let slacks = (0..n_constraints).map(|j| if i == j { T::one() } else { T::zero() });
                Row::new(
                    RowDVector::from_iterator(
                        n_columns,
                        constraint.coefficients.iter().cloned().chain(slacks),
                    ),
                    constraint.rhs,
                )
            })
            .collect();

        Self {
            n_variables,
            objective,
            rows,
            basis: (n_variables..n_columns).collect(),
            settings,
            iterations: 0,
            status: Status::Building,
        }
    }

    #[inline]
    pub fn n_variables(&self) -> usize {
        self.n_variables
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.objective.len()
    }

    #[inline]
    pub fn objective(&self) -> &Row<T> {
        &self.objective
    }

    #[inline]
    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    /// Basic variable of every row, by row position.
    #[inline]
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Pivots performed so far.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[inline]
    pub fn settings(&self) -> &SolverSettings<T> {
        &self.settings
    }

    #[inline]
    pub fn is_basic(&self, variable: usize) -> bool {
        self.basis.contains(&variable)
    }

    pub fn constraint_matrix(&self) -> DMatrix<T> {
        DMatrix::from_fn(self.rows.len(), self.n_columns(), |i, j| {
            self.rows[i].coefficients[j].clone()
        })
    }

    pub fn rhs(&self) -> DVector<T> {
        DVector::from_iterator(self.rows.len(), self.rows.iter().map(|row| row.rhs.clone()))
    }

    /// Most negative objective coefficient, first one on ties. `None` once no
    /// coefficient is below `-epsilon`, which means the tableau is optimal.
    pub fn least_negative_index(&self) -> Option<usize> {
        self.objective
            .coefficients
            .iter()
            .enumerate()
            .filter(|(_, coef)| coef.is_negative_within(&self.settings.epsilon))
            .min_by(|(_, coef1), (_, coef2)| coef1.partial_cmp(coef2).unwrap_or(Ordering::Equal))
            .map(|(i, _)| i)
    }

    /// Row position of the row whose basic variable is `variable`.
    pub fn row_for_basic_variable(&self, variable: usize) -> Option<usize> {
        self.basis.iter().position(|basic| *basic == variable)
    }

    pub fn entering_column(&self) -> Option<usize> {
        match self.settings.pivot_rule {
            PivotRule::Dantzig => self.least_negative_index(),
            PivotRule::Bland => self
                .objective
                .coefficients
                .iter()
                .position(|coef| coef.is_negative_within(&self.settings.epsilon)),
        }
    }

    /// Ratio test: among rows with a positive entry in `pivot_col`, the one
    /// with the smallest `rhs / entry`. `None` means the column is unbounded.
    pub fn leaving_row(&self, pivot_col: usize) -> Option<usize> {
        let epsilon = &self.settings.epsilon;
        let bland = self.settings.pivot_rule.is_bland();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.coefficients[pivot_col].is_positive_within(epsilon))
            .map(|(i, row)| (i, row.rhs.clone() / row.coefficients[pivot_col].clone()))
            .min_by(|(i1, ratio1), (i2, ratio2)| {
                let by_ratio = ratio1.partial_cmp(ratio2).unwrap_or(Ordering::Equal);
                if bland {
                    by_ratio.then_with(|| self.basis[*i1].cmp(&self.basis[*i2]))
                } else {
                    by_ratio
                }
            })
            .map(|(i, _)| i)
    }

    /// Makes `entering_column` basic in place of `leaving_variable`.
    pub fn pivot(
        &mut self,
        entering_column: usize,
        leaving_variable: usize,
    ) -> Result<(), PivotError> {
        if entering_column >= self.n_columns() {
            return Err(PivotError::ColumnOutOfRange {
                column: entering_column,
                n_columns: self.n_columns(),
            });
        }
        let pivot_row = self
            .row_for_basic_variable(leaving_variable)
            .ok_or(PivotError::NotBasic {
                variable: leaving_variable,
            })?;
        if self.rows[pivot_row].coefficients[entering_column].is_zero_within(&self.settings.epsilon)
        {
            return Err(PivotError::ZeroPivot {
                row: pivot_row,
                column: entering_column,
            });
        }

        self.pivot_at(pivot_row, entering_column);
        Ok(())
    }

    fn pivot_at(&mut self, pivot_row: usize, pivot_col: usize) {
        let cross_number = dbg_display!(self.rows[pivot_row].coefficients[pivot_col].clone());

        self.rows[pivot_row].divide_by(&cross_number);
        self.rows[pivot_row].coefficients[pivot_col] = T::one();
        // Eliminate with a snapshot so no row reads a partially updated pivot row.
        let pivot = self.rows[pivot_row].clone();

        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == pivot_row {
                continue;
            }
            let multiplier = row.coefficients[pivot_col].clone();
            if multiplier.is_zero() {
                continue;
            }
            row.subtract_scaled(&pivot, &multiplier);
            row.coefficients[pivot_col] = T::zero();
        }
        let multiplier = self.objective.coefficients[pivot_col].clone();
        self.objective.subtract_scaled(&pivot, &multiplier);
        self.objective.coefficients[pivot_col] = T::zero();

        log::info!(
            "x{} enters, x{} leaves",
            pivot_col + 1,
            self.basis[pivot_row] + 1
        );
        self.basis[pivot_row] = pivot_col;
    }

    /// Decision variable values read off the current basis, plus the
    /// objective value.
    pub fn solution(&self) -> Solution<T> {
        Solution {
            vars: DVector::from_iterator(
                self.n_variables,
                (0..self.n_variables).map(|variable| {
                    self.row_for_basic_variable(variable)
                        .map_or_else(T::zero, |i| self.rows[i].rhs.clone())
                }),
            ),
            fn_val: self.objective.rhs.clone(),
        }
    }

    /// One iteration. `None` after a pivot, `Some` with the verdict once the
    /// table is terminal; terminal tables keep returning the same verdict
    /// without being modified.
    pub fn step(&mut self) -> Option<SolutionResult<T>> {
        match self.status {
            Status::Building => {
                self.objective.negate();
                self.status = Status::Iterating;
            }
            Status::Iterating => {}
            Status::Optimal => return Some(Ok(self.solution())),
            Status::Unbounded => return Some(Err(SolutionError::Unbounded)),
            Status::NonConvergent => {
                return Some(Err(SolutionError::NonConvergent {
                    iterations: self.iterations,
                }))
            }
        }
        log::debug!("Tableau:\n{self}");

        let Some(pivot_col) = self.entering_column() else {
            log::info!("Optimal solution was found");
            self.status = Status::Optimal;
            return Some(Ok(self.solution()));
        };
        log::info!("Pivot column: {pivot_col}");

        let Some(pivot_row) = self.leaving_row(pivot_col) else {
            log::info!("No row limits x{}, the objective is unbounded", pivot_col + 1);
            self.status = Status::Unbounded;
            return Some(Err(SolutionError::Unbounded));
        };
        log::info!("Pivot row: {pivot_row}");

        // Only a pivot spends the budget; optimality and unboundedness are
        // still reported once it is exhausted.
        if let Some(max_iterations) = self.settings.max_iterations {
            if self.iterations >= max_iterations {
                log::warn!("Giving up after {} iterations", self.iterations);
                self.status = Status::NonConvergent;
                return Some(Err(SolutionError::NonConvergent {
                    iterations: self.iterations,
                }));
            }
        }

        self.pivot_at(pivot_row, pivot_col);
        self.iterations += 1;
        None
    }

    pub fn solve(&mut self) -> SolutionResult<T> {
        loop {
            log::info!("Iteration: {}", self.iterations + 1);
            if let Some(result) = self.step() {
                return result;
            }
        }
    }
}

impl<T: Number> fmt::Display for SimplexTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let basis = self
            .basis
            .iter()
            .map(|variable| format!("x{}", variable + 1))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "basis: [{basis}]\nobjective: {} = {}\nconstraints:{}rhs:{}",
            self.objective.coefficients,
            self.objective.rhs,
            self.constraint_matrix(),
            self.rhs()
        )
    }
}

#[cfg(test)]
mod tests;
