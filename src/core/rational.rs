//! Rational numbers and edit-unit conversion.

use std::fmt;

use serde::Serialize;

use crate::util::{le_i32, Result};

/// A rational value, as used for edit rates, gains and control points.
///
/// A zero denominator means the value is unknown and evaluates to 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rational {
    pub numerator: i32,
    pub denominator: i32,
}

impl Rational {
    pub const SIZE: usize = 8;

    pub const ZERO: Rational = Rational::new(0, 1);
    pub const ONE: Rational = Rational::new(1, 1);

    #[inline]
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self { numerator, denominator }
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        Ok(Self::new(le_i32(buf, 0)?, le_i32(buf, 4)?))
    }

    /// Floating value, 0 when the denominator is 0.
    #[inline]
    pub fn to_f64(self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f64 / self.denominator as f64
        }
    }

    /// Rounded integer value, 0 when the denominator is 0.
    pub fn to_i64_rounded(self) -> i64 {
        self.to_f64().round() as i64
    }

    /// Exact equality of the represented values (cross-multiplied).
    #[inline]
    pub fn same_value(self, other: Rational) -> bool {
        self.numerator as i64 * other.denominator as i64 == other.numerator as i64 * self.denominator as i64
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.numerator == 0 || self.denominator == 0
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// ============================================================================
// Edit-unit conversion
// ============================================================================

/// Convert `value` from units of `from` rate to units of `to` rate.
///
/// Equal rates return `value` unchanged; a zero rate on either side gives 0.
pub fn convert_unit(value: i64, from: Rational, to: Rational) -> i64 {
    if from.is_zero() || to.is_zero() {
        return 0;
    }
    if from.same_value(to) {
        return value;
    }
    (value as f64 * (to.to_f64() / from.to_f64())) as i64
}

/// Unsigned variant of [`convert_unit`]; negative results clamp to 0.
pub fn convert_unit_u64(value: u64, from: Rational, to: Rational) -> u64 {
    if from.is_zero() || to.is_zero() {
        return 0;
    }
    if from.same_value(to) {
        return value;
    }
    (value as f64 * (to.to_f64() / from.to_f64())).max(0.0) as u64
}
