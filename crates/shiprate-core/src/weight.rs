//! # Weight Module
//!
//! `Weight` is a whole number of grams. Product weights are kept to three
//! decimal places of a kilogram, so grams represent them exactly.
//!
//! ```rust
//! use shiprate_core::weight::Weight;
//!
//! let w = Weight::parse_kg("1.5").unwrap();
//! assert_eq!(w.grams(), 1500);
//! assert_eq!(w.to_string(), "1.500 kg");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::parse_scaled;

/// A weight in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Weight(i64);

impl Weight {
    /// Grams in one kilogram, the unit rates are quoted in.
    pub const GRAMS_PER_KG: i64 = 1000;

    #[inline]
    pub const fn from_grams(grams: i64) -> Self {
        Weight(grams)
    }

    #[inline]
    pub const fn grams(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Weight(0)
    }

    /// Parses kilograms with at most three decimals ("2", "1.5", "0.125").
    ///
    /// ```rust
    /// use shiprate_core::weight::Weight;
    ///
    /// assert_eq!(Weight::parse_kg("0.125").unwrap().grams(), 125);
    /// assert!(Weight::parse_kg("0.0001").is_err());
    /// ```
    pub fn parse_kg(input: &str) -> Result<Self, ValidationError> {
        parse_scaled(input, 3, "weight").map(Weight)
    }

    /// Multiplies a unit weight by a line quantity, saturating on overflow.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Weight(self.0.saturating_mul(qty))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let grams = self.0.abs();
        write!(
            f,
            "{}{}.{:03} kg",
            sign,
            grams / Self::GRAMS_PER_KG,
            grams % Self::GRAMS_PER_KG
        )
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::zero()
    }
}

/// Saturating, like `Money`.
impl Add for Weight {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Weight(self.0.saturating_add(other.0))
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        iter.fold(Weight::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kg() {
        assert_eq!(Weight::parse_kg("2").unwrap().grams(), 2000);
        assert_eq!(Weight::parse_kg("2.0").unwrap().grams(), 2000);
        assert_eq!(Weight::parse_kg("1.5").unwrap().grams(), 1500);
        assert_eq!(Weight::parse_kg("0.005").unwrap().grams(), 5);

        assert!(Weight::parse_kg("").is_err());
        assert!(Weight::parse_kg("1.2345").is_err());
        assert!(Weight::parse_kg("two").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Weight::from_grams(1500).to_string(), "1.500 kg");
        assert_eq!(Weight::from_grams(5).to_string(), "0.005 kg");
    }

    #[test]
    fn test_sum_and_quantity() {
        let total: Weight = vec![
            Weight::from_grams(250).multiply_quantity(4),
            Weight::from_grams(500).multiply_quantity(2),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.grams(), 2000);
    }

    #[test]
    fn test_overflow_saturates() {
        let heavy = Weight::from_grams(i64::MAX / 2);

        assert_eq!(heavy.multiply_quantity(3).grams(), i64::MAX);
        let total: Weight = vec![heavy, heavy, heavy].into_iter().sum();
        assert_eq!(total.grams(), i64::MAX);
    }
}
