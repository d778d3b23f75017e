use std::{
    fmt::Display,
    io::{self, Write},
};

use simplex_core::simplex::SolutionError;

use super::Report;

/// Optimum on `out`, one `x{i} = value` line per variable then `f = value`.
/// Anything else is a single line on `err`.
pub fn write_text(report: &Report, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    match report {
        Report::Optimal {
            variables,
            objective,
        } => {
            for (i, value) in variables.iter().enumerate() {
                writeln!(out, "x{} = {value}", i + 1)?;
            }
            writeln!(out, "f = {objective}")
        }
        Report::Unbounded => not_applicable(err, SolutionError::Unbounded),
        Report::NonConvergent { iterations } => not_applicable(
            err,
            SolutionError::NonConvergent {
                iterations: *iterations,
            },
        ),
        Report::NotApplicable { reason } => not_applicable(err, reason),
        Report::Error { message } => not_applicable(err, message),
    }
}

fn not_applicable(err: &mut impl Write, reason: impl Display) -> io::Result<()> {
    writeln!(err, "The method is not applicable: {reason}")
}
