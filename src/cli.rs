use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use simplex_core::{
    interior_point::DEFAULT_ALPHA,
    simplex::{PivotRule, DEFAULT_MAX_ITERATIONS},
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Method {
    /// Tableau simplex method
    #[default]
    Simplex,
    /// Affine-scaling interior-point method, float arithmetic only
    InteriorPoint,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Arithmetic {
    /// 64-bit floating point with an epsilon tolerance
    #[default]
    Float,
    /// Arbitrary-precision rationals, no rounding at all
    Exact,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum PivotRuleArg {
    #[default]
    Dantzig,
    Bland,
}

impl From<PivotRuleArg> for PivotRule {
    fn from(rule: PivotRuleArg) -> Self {
        match rule {
            PivotRuleArg::Dantzig => PivotRule::Dantzig,
            PivotRuleArg::Bland => PivotRule::Bland,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "simplex")]
#[command(version)]
#[command(about = "Maximizes a linear objective under <= constraints with the tableau simplex method")]
pub struct Args {
    /// Problem file, `-` or nothing reads stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "simplex")]
    pub method: Method,

    #[arg(short, long, value_enum, default_value = "float")]
    pub arithmetic: Arithmetic,

    /// Tolerance for sign tests, float arithmetic only
    #[arg(short, long)]
    pub epsilon: Option<f64>,

    /// Pivots allowed before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS, conflicts_with = "no_iteration_limit")]
    pub max_iterations: usize,

    /// Never give up; a cycling problem then runs forever
    #[arg(long)]
    pub no_iteration_limit: bool,

    #[arg(short, long, value_enum, default_value = "dantzig")]
    pub pivot_rule: PivotRuleArg,

    /// Share of the distance to the boundary taken per interior-point step
    #[arg(long, default_value_t = DEFAULT_ALPHA, value_parser = parse_alpha)]
    pub alpha: f64,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: Format,

    /// More output per occurrence (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_alpha(value: &str) -> Result<f64, String> {
    let alpha = value.parse::<f64>().map_err(|err| err.to_string())?;
    if alpha > 0. && alpha < 1. {
        Ok(alpha)
    } else {
        Err(format!("{alpha} is not strictly between 0 and 1"))
    }
}

impl Args {
    pub fn max_iterations(&self) -> Option<usize> {
        (!self.no_iteration_limit).then_some(self.max_iterations)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Path to read from, `None` for stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|path| *path != Path::new("-"))
    }
}
