use derive_new::new;

use crate::{
    interior_point::InteriorPointSettings,
    simplex::{Problem, SolutionResult, SolverSettings},
    InputResult, Number, ParsedInput,
};

/// Outcome of one run over a text input: the solver verdict and the number of
/// decimal places the input asked results to be printed with.
#[derive(Debug, Clone, PartialEq, new)]
pub struct Computed<T: nalgebra::Scalar> {
    pub precision: usize,
    pub result: SolutionResult<T>,
}

/// Parses `input`, builds the problem and runs the simplex method on it.
///
/// Only malformed input is an `Err`; an unbounded or non-convergent problem is
/// a successfully computed [`Computed::result`].
pub fn compute<T: Number>(input: &str, settings: SolverSettings<T>) -> InputResult<Computed<T>> {
    compute_with(input, |problem| problem.solve(settings))
}

/// Same as [`compute`] with the affine-scaling interior-point method.
pub fn compute_interior_point(
    input: &str,
    settings: InteriorPointSettings,
) -> InputResult<Computed<f64>> {
    compute_with(input, |problem| problem.solve_interior_point(settings))
}

fn compute_with<T: Number>(
    input: &str,
    solve: impl FnOnce(Problem<T>) -> SolutionResult<T>,
) -> InputResult<Computed<T>> {
    log::debug!("Received input:\n{}", input.trim_end());

    let parsed = ParsedInput::<T>::parse(input)?;
    let precision = parsed.precision;
    let problem = parsed.into_problem()?;
    log::info!("Problem formed: {problem}");

    let result = solve(problem);
    match &result {
        Ok(solution) => log::info!("Solution:\n{solution}"),
        Err(non_compliant) => log::info!("No solution: {non_compliant}"),
    }

    Ok(Computed::new(precision, result))
}
