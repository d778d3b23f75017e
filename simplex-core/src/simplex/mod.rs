mod problem;
mod row;
mod settings;
mod solution;
mod table;

pub use problem::*;
pub use row::Row;
pub use settings::{PivotRule, SolverSettings, DEFAULT_MAX_ITERATIONS};
pub use solution::{Solution, SolutionError, SolutionResult};
pub use table::{PivotError, SimplexTable, Status};
