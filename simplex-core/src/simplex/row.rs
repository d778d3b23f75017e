use derive_new::new;
use nalgebra::{RowDVector, Scalar};

use crate::Number;

/// One line of the tableau: coefficients over every column plus the scalar
/// on the right-hand side (the objective value for the objective row).
#[derive(Debug, Clone, PartialEq, new)]
pub struct Row<T: Scalar> {
    pub(crate) coefficients: RowDVector<T>,
    pub(crate) rhs: T,
}

impl<T: Number> Row<T> {
    #[inline]
    pub fn coefficients(&self) -> &RowDVector<T> {
        &self.coefficients
    }

    #[inline]
    pub fn rhs(&self) -> &T {
        &self.rhs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub(crate) fn negate(&mut self) {
        self.coefficients.apply(|el| *el = -el.clone());
        self.rhs = -self.rhs.clone();
    }

    pub(crate) fn divide_by(&mut self, divisor: &T) {
        self.coefficients.apply(|el| *el /= divisor.clone());
        self.rhs /= divisor.clone();
    }

    /// `self -= multiplier * other`, rhs included.
    pub(crate) fn subtract_scaled(&mut self, other: &Row<T>, multiplier: &T) {
        self.coefficients
            .zip_apply(&other.coefficients, |el, other_el| {
                *el -= other_el * multiplier.clone()
            });
        self.rhs -= other.rhs.clone() * multiplier.clone();
    }
}
