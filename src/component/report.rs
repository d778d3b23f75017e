use std::io::Write;

use serde::Serialize;
use simplex_core::{
    simplex::{Solution, SolutionError, SolutionResult},
    Number,
};

use crate::app::{AppError, Exit};

/// Everything a run produced, already formatted with the requested precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Report {
    Optimal {
        variables: Vec<String>,
        objective: String,
    },
    Unbounded,
    NonConvergent {
        iterations: usize,
    },
    /// The chosen method cannot start or continue on this problem.
    NotApplicable {
        reason: String,
    },
    Error {
        message: String,
    },
}

impl Report {
    pub fn new<T: Number>(result: &SolutionResult<T>, precision: usize) -> Self {
        match result {
            Ok(Solution { vars, fn_val }) => Self::Optimal {
                variables: vars
                    .iter()
                    .map(|value| value.to_fixed_string(precision))
                    .collect(),
                objective: fn_val.to_fixed_string(precision),
            },
            Err(SolutionError::Unbounded) => Self::Unbounded,
            Err(SolutionError::NonConvergent { iterations }) => Self::NonConvergent {
                iterations: *iterations,
            },
            Err(
                reason @ (SolutionError::NoInteriorPoint { .. } | SolutionError::SingularProjection),
            ) => Self::NotApplicable {
                reason: reason.to_string(),
            },
        }
    }

    pub fn exit(&self) -> Exit {
        match self {
            Self::Optimal { .. } => Exit::Optimal,
            Self::Unbounded | Self::NonConvergent { .. } | Self::NotApplicable { .. } => {
                Exit::NotApplicable
            }
            Self::Error { .. } => Exit::Failure,
        }
    }
}

impl From<AppError> for Report {
    fn from(error: AppError) -> Self {
        log::error!("{error}");
        Self::Error {
            message: error.to_string(),
        }
    }
}

/// One JSON object per line on `out`, whatever the outcome.
pub fn write_json(report: &Report, out: &mut impl Write) -> serde_json::Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out).map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use num_rational::BigRational;
    use pretty_assertions::{assert_eq, assert_str_eq};
    use simplex_core::nalgebra::DVector;

    use super::*;

    fn to_json(report: &Report) -> String {
        let mut out = Vec::new();
        write_json(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn optimal_report_uses_the_precision() {
        let result: SolutionResult<BigRational> = Ok(Solution {
            vars: DVector::from_vec(vec![
                BigRational::new(2.into(), 3.into()),
                BigRational::new(6.into(), 1.into()),
            ]),
            fn_val: BigRational::new(110.into(), 3.into()),
        });

        assert_eq!(
            Report::new(&result, 2),
            Report::Optimal {
                variables: vec!["0.67".to_owned(), "6.00".to_owned()],
                objective: "36.67".to_owned(),
            }
        );
    }

    #[test]
    fn json_is_tagged_by_status() {
        assert_str_eq!(
            to_json(&Report::Optimal {
                variables: vec!["2.00".to_owned(), "6.00".to_owned()],
                objective: "36.00".to_owned(),
            }),
            "{\"status\":\"optimal\",\"variables\":[\"2.00\",\"6.00\"],\"objective\":\"36.00\"}\n"
        );
        assert_str_eq!(to_json(&Report::Unbounded), "{\"status\":\"unbounded\"}\n");
        assert_str_eq!(
            to_json(&Report::NonConvergent { iterations: 7 }),
            "{\"status\":\"non-convergent\",\"iterations\":7}\n"
        );
    }

    #[test]
    fn interior_point_failures_are_not_applicable() {
        let result: SolutionResult<f64> = Err(SolutionError::NoInteriorPoint { row: 2 });
        let report = Report::new(&result, 2);

        assert_str_eq!(
            to_json(&report),
            "{\"status\":\"not-applicable\",\"reason\":\"constraint 2 leaves no strictly interior starting point\"}\n"
        );
        assert_eq!(report.exit(), Exit::NotApplicable);
    }

    #[test]
    fn exit_codes_follow_the_outcome() {
        assert_eq!(Report::Unbounded.exit(), Exit::NotApplicable);
        assert_eq!(Report::NonConvergent { iterations: 1 }.exit(), Exit::NotApplicable);
        assert_eq!(
            Report::Error {
                message: String::new()
            }
            .exit(),
            Exit::Failure
        );
    }
}
