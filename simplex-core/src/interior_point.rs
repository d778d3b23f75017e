//! Affine-scaling interior-point method for the same `<=` problems the
//! simplex tableau solves, in floating point only.
//!
//! The iterate stays strictly inside the feasible region: each step moves
//! along the objective projected onto the null space of the scaled
//! constraints, stopping short of the boundary by the factor `alpha`.

use derive_new::new;
use nalgebra::{Cholesky, DMatrix, DVector};

use crate::{
    simplex::{Problem, Solution, SolutionError, SolutionResult, DEFAULT_MAX_ITERATIONS},
    Number,
};

pub const DEFAULT_ALPHA: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, new)]
pub struct InteriorPointSettings {
    /// Fraction of the distance to the boundary covered per step, in `(0, 1)`.
    pub alpha: f64,
    /// Convergence threshold on the projected gradient and the step length.
    #[new(value = "f64::default_epsilon()")]
    pub epsilon: f64,
    #[new(value = "Some(DEFAULT_MAX_ITERATIONS)")]
    pub max_iterations: Option<usize>,
}

impl Default for InteriorPointSettings {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl InteriorPointSettings {
    pub fn with_epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    pub fn with_max_iterations(self, max_iterations: Option<usize>) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteriorPoint {
    n_variables: usize,
    /// `[A | I]`, slack columns appended.
    constraints: DMatrix<f64>,
    /// `[c | 0]`
    objective: DVector<f64>,
    point: DVector<f64>,
    settings: InteriorPointSettings,
    iterations: usize,
}

impl InteriorPoint {
    /// Starts from `x_j = delta` for every decision variable, with `delta`
    /// small enough that every slack is at least half its right-hand side.
    /// That needs every right-hand side to be strictly positive.
    pub fn new(problem: Problem<f64>, settings: InteriorPointSettings) -> Result<Self, SolutionError> {
        let n_variables = problem.n_variables();
        let n_constraints = problem.n_constraints();
        let n_columns = n_variables + n_constraints;

        let mut delta = f64::INFINITY;
        for (i, constraint) in problem.constraints.iter().enumerate() {
            if !constraint.rhs.is_positive_within(&settings.epsilon) {
                log::info!("Constraint {} has a non-positive right-hand side", i + 1);
                return Err(SolutionError::NoInteriorPoint { row: i + 1 });
            }
            let growth: f64 = constraint
                .coefficients
                .iter()
                .map(|coef| coef.max(0.))
                .sum();
            delta = delta.min(constraint.rhs / (2. * growth + 1.));
        }

        let constraints = DMatrix::from_fn(n_constraints, n_columns, |i, j| {
            if j < n_variables {
                problem.constraints[i].coefficients[j]
            } else if j - n_variables == i {
                1.
            } else {
                0.
            }
        });
        let objective = DVector::from_iterator(
            n_columns,
            problem
                .objective_function
                .coefficients
                .iter()
                .cloned()
                .chain(std::iter::repeat(0.).take(n_constraints)),
        );
        let point = DVector::from_iterator(
            n_columns,
            std::iter::repeat(delta).take(n_variables).chain(
                problem.constraints.iter().map(|constraint| {
                    constraint.rhs - constraint.coefficients.sum() * delta
                }),
            ),
        );
        log::debug!("Starting point:{point}");

        Ok(Self {
            n_variables,
            constraints,
            objective,
            point,
            settings,
            iterations: 0,
        })
    }

    /// Current iterate, slack variables included.
    #[inline]
    pub fn point(&self) -> &DVector<f64> {
        &self.point
    }

    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// `D c` projected onto the null space of `A D`, `D = diag(x)`.
    fn projected_gradient(&self) -> Result<DVector<f64>, SolutionError> {
        let scaled = &self.constraints * DMatrix::from_diagonal(&self.point);
        let gradient = self.objective.component_mul(&self.point);

        let normal = &scaled * scaled.transpose();
        let diagonal = normal.diagonal();
        let epsilon = self.settings.epsilon;
        let cholesky = Cholesky::new(normal)
            .filter(|cholesky| {
                cholesky
                    .l()
                    .diagonal()
                    .iter()
                    .zip(diagonal.iter())
                    .all(|(l, f)| l * l > epsilon * f)
            })
            .ok_or(SolutionError::SingularProjection)?;

        Ok(&gradient - scaled.transpose() * cholesky.solve(&(&scaled * &gradient)))
    }

    fn solution(&self) -> Solution<f64> {
        let vars = self.point.rows(0, self.n_variables).into_owned();
        let fn_val = self.objective.rows(0, self.n_variables).dot(&vars);
        Solution { vars, fn_val }
    }

    /// One move of the iterate. `None` after a move, `Some` with the verdict
    /// once the method has stopped.
    pub fn step(&mut self) -> Option<SolutionResult<f64>> {
        let projected = match self.projected_gradient() {
            Ok(projected) => projected,
            Err(err) => return Some(Err(err)),
        };
        let epsilon = self.settings.epsilon;

        let largest = projected.amax();
        if largest <= epsilon {
            log::info!("Projected gradient vanished, the point is optimal");
            return Some(Ok(self.solution()));
        }
        let nu = -projected.min();
        if nu <= epsilon * largest {
            log::info!("No coordinate decreases along the projected gradient, the objective is unbounded");
            return Some(Err(SolutionError::Unbounded));
        }

        if let Some(max_iterations) = self.settings.max_iterations {
            if self.iterations >= max_iterations {
                log::warn!("Giving up after {} iterations", self.iterations);
                return Some(Err(SolutionError::NonConvergent {
                    iterations: self.iterations,
                }));
            }
        }

        let alpha = self.settings.alpha;
        let next = self
            .point
            .component_mul(&projected.map(|value| 1. + alpha / nu * value));
        let moved = (&next - &self.point).norm();
        self.point = next;
        self.iterations += 1;
        log::debug!("Moved by {moved}");

        (moved < epsilon).then(|| {
            log::info!("Step shorter than {epsilon}, the point is optimal");
            Ok(self.solution())
        })
    }

    pub fn solve(&mut self) -> SolutionResult<f64> {
        loop {
            log::info!("Iteration: {}", self.iterations + 1);
            if let Some(result) = self.step() {
                return result;
            }
        }
    }
}

impl Problem<f64> {
    pub fn solve_interior_point(self, settings: InteriorPointSettings) -> SolutionResult<f64> {
        InteriorPoint::new(self, settings)?.solve()
    }
}
