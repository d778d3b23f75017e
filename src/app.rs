use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
    process::ExitCode,
};

use derive_more::{Display, Error, From, IsVariant};
use num_rational::BigRational;
use simplex_core::{
    command::{compute, compute_interior_point, Computed},
    interior_point::InteriorPointSettings,
    simplex::SolverSettings,
    InputError, Number,
};

use crate::{
    cli::{Args, Arithmetic, Format, Method},
    component::{write_json, write_text, Report},
};

#[derive(Debug, Display, Error, From, IsVariant)]
pub enum AppError {
    #[display(fmt = "cannot read input: {}", _0)]
    Io(io::Error),
    #[display(fmt = "{}", _0)]
    Input(InputError),
    #[display(fmt = "cannot write report: {}", _0)]
    Serialize(serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Optimal = 0,
    /// Unbounded or out of iterations.
    NotApplicable = 1,
    Failure = 2,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

pub fn run(args: &Args) -> Exit {
    let report = read_input(args.input_path())
        .map_or_else(Report::from, |input| execute(args, &input));
    let exit = report.exit();

    match present(args.format, &report, &mut io::stdout().lock(), &mut io::stderr().lock()) {
        Ok(()) => exit,
        Err(error) => {
            log::error!("{error}");
            Exit::Failure
        }
    }
}

/// Whole input as a string, from `path` or stdin when there is none.
pub fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    match path {
        Some(path) => {
            log::info!("Reading {}", path.display());
            Ok(fs::read_to_string(path)?)
        }
        None => {
            log::info!("Reading stdin");
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

pub fn execute(args: &Args, input: &str) -> Report {
    let report = match (args.method, args.arithmetic) {
        (Method::InteriorPoint, arithmetic) => {
            if arithmetic == Arithmetic::Exact {
                log::warn!("The interior-point method always runs in floating point");
            }
            solve_interior_point(args, input)
        }
        (Method::Simplex, Arithmetic::Float) => solve_with(args, input, float_epsilon(args)),
        (Method::Simplex, Arithmetic::Exact) => {
            if args.epsilon.is_some() {
                log::warn!("--epsilon has no effect with exact arithmetic");
            }
            solve_with(args, input, BigRational::default_epsilon())
        }
    };
    report.unwrap_or_else(Report::from)
}

fn float_epsilon(args: &Args) -> f64 {
    let epsilon = args.epsilon.unwrap_or_else(f64::default_epsilon);
    if epsilon < 0. {
        log::warn!("Negative epsilon {epsilon} makes every sign test stricter than exact");
    }
    epsilon
}

fn solve_interior_point(args: &Args, input: &str) -> Result<Report, AppError> {
    let settings = InteriorPointSettings::new(args.alpha)
        .with_epsilon(float_epsilon(args))
        .with_max_iterations(args.max_iterations());
    log::debug!("Settings: {settings:?}");

    let Computed { precision, result } = compute_interior_point(input, settings)?;
    Ok(Report::new(&result, precision))
}

fn solve_with<T: Number>(args: &Args, input: &str, epsilon: T) -> Result<Report, AppError> {
    let settings = SolverSettings::new(epsilon)
        .with_max_iterations(args.max_iterations())
        .with_pivot_rule(args.pivot_rule.into());
    log::debug!("Settings: {settings:?}");

    let Computed { precision, result } = compute(input, settings)?;
    Ok(Report::new(&result, precision))
}

pub fn present(
    format: Format,
    report: &Report,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), AppError> {
    match format {
        Format::Text => write_text(report, out, err)?,
        Format::Json => write_json(report, out)?,
    }
    Ok(())
}
