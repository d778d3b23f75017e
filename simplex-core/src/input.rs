//! Reading a problem from its whitespace-separated text form.
//!
//! ```text
//! 3 5          objective coefficients, n values
//! 1 0          constraint rows, n values each
//! 0 2
//! 3 2
//! 4 12 18      right-hand sides, one per constraint
//! 0.01         display precision: digits after the decimal point
//! ```
//!
//! Blank lines are skipped. The last line is always the precision line and
//! the one before it the right-hand sides.

use derive_more::{Display, Error, IsVariant};
use nalgebra::RowDVector;

use crate::{
    simplex::{Constraint, ObjectiveFunction, Problem},
    Number,
};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error, IsVariant)]
pub enum InputError {
    #[display(fmt = "not enough results: expected {}, found {}", expected, found)]
    NotEnoughResults { expected: usize, found: usize },
    #[display(
        fmt = "dimension mismatch: constraint {} has {} coefficients, the objective function has {}",
        row,
        found,
        expected
    )]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display(fmt = "no precision value provided")]
    MissingPrecision,
    #[display(fmt = "line {}: {:?} is not a number", line, token)]
    InvalidNumber { line: usize, token: String },
    #[display(fmt = "the objective function has no variables")]
    NoVariables,
}

pub type InputResult<T> = Result<T, InputError>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput<T> {
    pub objective: Vec<T>,
    pub constraints: Vec<Vec<T>>,
    pub rhs: Vec<T>,
    /// Digits after the decimal point used when printing results.
    pub precision: usize,
}

impl<T: Number> ParsedInput<T> {
    pub fn parse(input: &str) -> InputResult<Self> {
        let lines = input
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.split_whitespace().collect::<Vec<_>>()))
            .filter(|(_, tokens)| !tokens.is_empty())
            .collect::<Vec<_>>();

        let Some(((precision_line, precision_tokens), rest)) = lines.split_last() else {
            return Err(InputError::NotEnoughResults {
                expected: 2,
                found: 0,
            });
        };
        if rest.is_empty() {
            return Err(InputError::NotEnoughResults {
                expected: 2,
                found: 1,
            });
        }
        let precision = match precision_tokens.as_slice() {
            [token] => {
                parse_number::<T>(*precision_line, token)?;
                fractional_digits(token)
            }
            _ => return Err(InputError::MissingPrecision),
        };

        let (objective_line, rest) = (&rest[0], &rest[1..]);
        let objective = parse_line::<T>(objective_line)?;
        if objective.is_empty() {
            return Err(InputError::NoVariables);
        }

        let Some((rhs_line, constraint_lines)) = rest.split_last() else {
            return Err(InputError::NotEnoughResults {
                expected: 1,
                found: 0,
            });
        };
        if constraint_lines.is_empty() {
            return Err(InputError::NotEnoughResults {
                expected: 1,
                found: 0,
            });
        }

        let constraints = constraint_lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let row = parse_line::<T>(line)?;
                if row.len() != objective.len() {
                    return Err(InputError::DimensionMismatch {
                        row: i + 1,
                        expected: objective.len(),
                        found: row.len(),
                    });
                }
                Ok(row)
            })
            .collect::<InputResult<Vec<_>>>()?;

        let mut rhs = parse_line::<T>(rhs_line)?;
        if rhs.len() < constraints.len() {
            return Err(InputError::NotEnoughResults {
                expected: constraints.len(),
                found: rhs.len(),
            });
        }
        if rhs.len() > constraints.len() {
            log::warn!(
                "Ignoring {} extra right-hand side value(s)",
                rhs.len() - constraints.len()
            );
            rhs.truncate(constraints.len());
        }

        Ok(Self {
            objective,
            constraints,
            rhs,
            precision,
        })
    }

    pub fn into_problem(self) -> InputResult<Problem<T>> {
        let Self {
            objective,
            constraints,
            rhs,
            ..
        } = self;
        Problem::new(
            ObjectiveFunction::new(RowDVector::from_vec(objective)),
            constraints
                .into_iter()
                .zip(rhs)
                .map(|(coefficients, rhs)| Constraint::new(RowDVector::from_vec(coefficients), rhs))
                .collect(),
        )
    }
}

/// Number of digits after the decimal point, e.g. `0.001` gives 3.
pub fn fractional_digits(token: &str) -> usize {
    token.split_once('.').map_or(0, |(_, fraction)| {
        fraction.chars().take_while(char::is_ascii_digit).count()
    })
}

fn parse_line<T: Number>((line, tokens): &(usize, Vec<&str>)) -> InputResult<Vec<T>> {
    tokens
        .iter()
        .map(|token| parse_number(*line, token))
        .collect()
}

fn parse_number<T: Number>(line: usize, token: &str) -> InputResult<T> {
    T::parse_decimal(token).ok_or_else(|| InputError::InvalidNumber {
        line,
        token: token.to_owned(),
    })
}
