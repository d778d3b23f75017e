use derive_more::{Display, Error, IsVariant};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::Signed;

/// Largest power of ten accepted in a literal's exponent part.
const MAX_EXPONENT: u64 = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error, IsVariant)]
pub enum ParseDecimalError {
    #[display(fmt = "empty decimal literal")]
    Empty,
    #[display(fmt = "invalid decimal literal {:?}", literal)]
    InvalidLiteral { literal: String },
    #[display(fmt = "exponent of {:?} is out of range", literal)]
    ExponentOutOfRange { literal: String },
}

/// Exact conversions between decimal text and [`BigRational`].
pub trait BigRationalExt: Sized {
    /// Parses literals like `12`, `-0.25`, `.5` or `1.5e-3` without going
    /// through binary floating point, so `0.1` becomes exactly `1/10`.
    fn from_decimal_str(literal: &str) -> Result<Self, ParseDecimalError>;

    /// Formats the value with exactly `precision` fractional digits,
    /// rounding half-way cases away from zero.
    fn to_fixed_string(&self, precision: usize) -> String;
}

impl BigRationalExt for BigRational {
    fn from_decimal_str(literal: &str) -> Result<Self, ParseDecimalError> {
        let literal = literal.trim();
        if literal.is_empty() {
            return Err(ParseDecimalError::Empty);
        }
        let invalid = || ParseDecimalError::InvalidLiteral {
            literal: literal.to_owned(),
        };

        let (mantissa, exponent) = match literal.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => (
                &literal[..pos],
                literal[pos + 1..].parse::<i64>().map_err(|_| invalid())?,
            ),
            None => (literal, 0),
        };
        let (negative, digits) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty()
            || !whole
                .chars()
                .chain(fraction.chars())
                .all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let exponent = i64::try_from(fraction.len())
            .ok()
            .and_then(|shift| exponent.checked_sub(shift))
            .filter(|exponent| exponent.unsigned_abs() <= MAX_EXPONENT)
            .ok_or_else(|| ParseDecimalError::ExponentOutOfRange {
                literal: literal.to_owned(),
            })?;

        let mut numer: BigInt = format!("{whole}{fraction}").parse().map_err(|_| invalid())?;
        if negative {
            numer = -numer;
        }
        let scale = BigInt::from(10u8).pow(exponent.unsigned_abs() as u32);
        Ok(if exponent >= 0 {
            BigRational::from_integer(numer * scale)
        } else {
            BigRational::new(numer, scale)
        })
    }

    fn to_fixed_string(&self, precision: usize) -> String {
        let scale = BigInt::from(10u8).pow(precision as u32);
        let scaled = (self * BigRational::from_integer(scale.clone()))
            .round()
            .to_integer();
        let sign = if scaled.is_negative() { "-" } else { "" };
        let (whole, fraction) = scaled.abs().div_rem(&scale);

        if precision == 0 {
            return format!("{sign}{whole}");
        }
        format!("{sign}{whole}.{:0>precision$}", fraction.to_string())
    }
}
