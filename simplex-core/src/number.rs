use std::{
    fmt,
    ops::{Div, DivAssign, Mul, Neg, Sub, SubAssign},
};

use nalgebra::Scalar;
use num_rational::BigRational;
use num_traits::{One, Zero};
use ratio_extension::BigRationalExt;

/// Scalar the simplex tableau is computed over.
///
/// Implemented for `f64`, where sign tests go through a small tolerance, and
/// for [`BigRational`], where arithmetic is exact and the tolerance is zero.
pub trait Number:
    Scalar
    + PartialOrd
    + fmt::Display
    + Zero
    + One
    + Neg<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + SubAssign
    + DivAssign
{
    fn default_epsilon() -> Self;

    fn parse_decimal(literal: &str) -> Option<Self>;

    fn to_fixed_string(&self, precision: usize) -> String;

    #[inline]
    fn is_negative_within(&self, epsilon: &Self) -> bool {
        *self < -epsilon.clone()
    }

    #[inline]
    fn is_positive_within(&self, epsilon: &Self) -> bool {
        self > epsilon
    }

    #[inline]
    fn is_zero_within(&self, epsilon: &Self) -> bool {
        !self.is_negative_within(epsilon) && !self.is_positive_within(epsilon)
    }
}

impl Number for f64 {
    #[inline]
    fn default_epsilon() -> Self {
        1e-9
    }

    fn parse_decimal(literal: &str) -> Option<Self> {
        literal.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    fn to_fixed_string(&self, precision: usize) -> String {
        let formatted = format!("{self:.precision$}");
        match formatted.strip_prefix('-') {
            Some(magnitude) if magnitude.chars().all(|c| c == '0' || c == '.') => {
                magnitude.to_owned()
            }
            _ => formatted,
        }
    }
}

impl Number for BigRational {
    #[inline]
    fn default_epsilon() -> Self {
        Zero::zero()
    }

    fn parse_decimal(literal: &str) -> Option<Self> {
        <BigRational as BigRationalExt>::from_decimal_str(literal).ok()
    }

    fn to_fixed_string(&self, precision: usize) -> String {
        BigRationalExt::to_fixed_string(self, precision)
    }
}
