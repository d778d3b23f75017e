use derive_more::{Display, IsVariant};
use derive_new::new;

use crate::Number;

pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// How the entering and leaving variables are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IsVariant)]
pub enum PivotRule {
    /// Most negative objective coefficient enters; ties on either choice go
    /// to the first candidate in scan order. May cycle on degenerate
    /// problems.
    #[default]
    #[display(fmt = "Dantzig")]
    Dantzig,
    /// Lowest-index improving column enters; ratio ties go to the row whose
    /// basic variable has the lowest index. Always terminates.
    #[display(fmt = "Bland")]
    Bland,
}

#[derive(Debug, Clone, PartialEq, new)]
pub struct SolverSettings<T> {
    /// Tolerance for every sign test made by the engine.
    pub epsilon: T,
    /// Pivot budget; `None` lets degenerate problems cycle forever.
    #[new(value = "Some(DEFAULT_MAX_ITERATIONS)")]
    pub max_iterations: Option<usize>,
    #[new(default)]
    pub pivot_rule: PivotRule,
}

impl<T: Number> Default for SolverSettings<T> {
    fn default() -> Self {
        Self::new(T::default_epsilon())
    }
}

impl<T> SolverSettings<T> {
    pub fn with_max_iterations(self, max_iterations: Option<usize>) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    pub fn with_pivot_rule(self, pivot_rule: PivotRule) -> Self {
        Self { pivot_rule, ..self }
    }
}
