//! Numeric values that remember whether they are exact integers.
//!
//! [`Number`] is the value type handed out by the matrix contract and the
//! merge iterator: either an exact `i64` or an `f64`. [`NumberKind`] refines
//! the real case into NaN and the two infinities.
//!
//! # Example
//!
//! ```
//! use stepmerge::{Number, NumberKind};
//!
//! assert_eq!(Number::Int(3).kind(), NumberKind::Integer);
//! assert_eq!(Number::Real(f64::NAN).kind(), NumberKind::NaN);
//!
//! // Reals that hold an exact integer can be narrowed without loss.
//! assert_eq!(Number::from_f64_exact(4.0), Number::Int(4));
//! assert_eq!(Number::from_f64_exact(4.5), Number::Real(4.5));
//! ```

use std::cmp::Ordering;
use std::fmt;

use approx::{AbsDiffEq, RelativeEq};

/// Smallest power of two that no longer fits in `i64` (2^63).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Classification of a [`Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberKind {
    /// Exact integer.
    Integer,
    /// Finite real number.
    Real,
    /// Not a number.
    NaN,
    /// Positive infinity.
    PositiveInfinity,
    /// Negative infinity.
    NegativeInfinity,
}

impl NumberKind {
    /// Whether values of this kind are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

/// A number that is either an exact integer or a real.
///
/// Returned by value; nothing in this crate hands out a shared mutable box.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    /// Exact 64-bit integer.
    Int(i64),
    /// IEEE-754 double.
    Real(f64),
}

impl Number {
    /// Classify this number.
    #[inline]
    pub fn kind(self) -> NumberKind {
        match self {
            Self::Int(_) => NumberKind::Integer,
            Self::Real(v) if v.is_nan() => NumberKind::NaN,
            Self::Real(v) if v == f64::INFINITY => NumberKind::PositiveInfinity,
            Self::Real(v) if v == f64::NEG_INFINITY => NumberKind::NegativeInfinity,
            Self::Real(_) => NumberKind::Real,
        }
    }

    /// Narrow a real to [`Number::Int`] when it holds an exact `i64` value.
    ///
    /// `-0.0` stays real so the sign bit survives.
    #[inline]
    pub fn from_f64_exact(value: f64) -> Self {
        if is_exact_i64(value) {
            Self::Int(value as i64)
        } else {
            Self::Real(value)
        }
    }

    /// Value as `f64`. Large integers round to the nearest double.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Real(v) => v,
        }
    }

    /// Value as `i64`, with `as`-cast semantics for reals
    /// (truncation toward zero, saturation, NaN to 0).
    #[inline]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Int(v) => v,
            Self::Real(v) => v as i64,
        }
    }

    /// Whether the value is an exact integer, whatever its representation.
    #[inline]
    pub fn is_integral(self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Real(v) => is_exact_i64(v),
        }
    }

    /// Whether this is an [`Number::Int`].
    #[inline]
    pub fn is_int(self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Numeric ordering across representations.
    ///
    /// Integers compare exactly with each other. Mixed comparisons go
    /// through `f64`. NaN sorts after every other value and equal to itself.
    pub fn cmp_numeric(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(&b),
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                match (a.is_nan(), b.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                }
            }
        }
    }
}

/// Whether `value` is an integer that survives an `i64` round trip.
#[inline]
pub(crate) fn is_exact_i64(value: f64) -> bool {
    value.fract() == 0.0
        && (-I64_BOUND..I64_BOUND).contains(&value)
        && !(value == 0.0 && value.is_sign_negative())
}

/// Bit pattern used for equality and hashing of reals: NaNs collapse to one
/// value, `0.0` and `-0.0` stay distinct.
#[inline]
pub(crate) fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Number {
    /// Same representation and same value. `Int(1) != Real(1.0)`.
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => canonical_bits(a) == canonical_bits(b),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl std::hash::Hash for Number {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match *self {
            Self::Int(v) => {
                state.write_u8(0);
                state.write_i64(v);
            }
            Self::Real(v) => {
                state.write_u8(1);
                state.write_u64(canonical_bits(v));
            }
        }
    }
}

impl From<i64> for Number {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v:?}"),
        }
    }
}

impl AbsDiffEq for Number {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (a, b) => a.as_f64().abs_diff_eq(&b.as_f64(), epsilon),
        }
    }
}

impl RelativeEq for Number {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (a, b) => a.as_f64().relative_eq(&b.as_f64(), epsilon, max_relative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kinds() {
        assert_eq!(Number::Int(-7).kind(), NumberKind::Integer);
        assert_eq!(Number::Real(0.25).kind(), NumberKind::Real);
        assert_eq!(Number::Real(f64::NAN).kind(), NumberKind::NaN);
        assert_eq!(Number::Real(f64::INFINITY).kind(), NumberKind::PositiveInfinity);
        assert_eq!(Number::Real(f64::NEG_INFINITY).kind(), NumberKind::NegativeInfinity);
        assert!(!NumberKind::NaN.is_finite());
    }

    #[test]
    fn exact_narrowing() {
        assert_eq!(Number::from_f64_exact(12.0), Number::Int(12));
        assert_eq!(Number::from_f64_exact(-3.0), Number::Int(-3));
        assert_eq!(Number::from_f64_exact(0.5), Number::Real(0.5));
        assert!(!Number::from_f64_exact(-0.0).is_int());
        assert!(!Number::from_f64_exact(1e300).is_int());
        assert!(!Number::from_f64_exact(f64::NAN).is_int());
    }

    #[test]
    fn equality_is_representation_aware() {
        assert_ne!(Number::Int(1), Number::Real(1.0));
        assert_eq!(Number::Real(f64::NAN), Number::Real(f64::NAN));
        assert_ne!(Number::Real(0.0), Number::Real(-0.0));
    }

    #[test]
    fn numeric_ordering() {
        assert_eq!(Number::Int(2).cmp_numeric(Number::Real(2.5)), Ordering::Less);
        assert_eq!(Number::Int(3).cmp_numeric(Number::Real(3.0)), Ordering::Equal);
        assert_eq!(Number::Real(f64::NAN).cmp_numeric(Number::Int(i64::MAX)), Ordering::Greater);
        assert_eq!(Number::Int(i64::MAX).cmp_numeric(Number::Int(i64::MAX - 1)), Ordering::Greater);
    }

    #[test]
    fn approx_comparison() {
        assert_relative_eq!(Number::Real(0.1 + 0.2), Number::Real(0.3));
        assert_relative_eq!(Number::Int(3), Number::Real(3.0));
    }

    #[test]
    fn display() {
        assert_eq!(Number::Int(42).to_string(), "42");
        assert_eq!(Number::Real(1.0).to_string(), "1.0");
    }
}
