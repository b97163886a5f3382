//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  535.00/kg × 1.5 kg in f64 is fine; 0.1 + 0.2 is not:                  │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    rate 53500 (cents/kg) × weight 1500 (grams) = 80_250_000            │
//! │    ÷ 1000, rounded half up ONCE  → 80250 cents = 802.50                │
//! │                                                                         │
//! │  The product of cents and grams is exact, so the only rounding in a    │
//! │  shipping charge is the final one.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shiprate_core::money::Money;
//! use shiprate_core::weight::Weight;
//!
//! let rate = Money::from_cents(4000); // 40.00 per kg
//! let cost = rate.charge_for_weight(Weight::from_grams(2000));
//! assert_eq!(cost.cents(), 8000); // 80.00
//!
//! let parsed = Money::parse("802.50").unwrap();
//! assert_eq!(parsed.cents(), 80250);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::weight::Weight;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents, paise, ...).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative input parses, then fails validation with a clear error
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No currency**: conversion happens outside this system
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CartLine.unit_price ──► CartSnapshot.total_value ──► cart_total        │
/// │                                                                         │
/// │  ZoneEntry.cost_per_kg ─┐                                               │
/// │  RateEntry.cost_per_kg ─┼──► charge_for_weight() ──► ShippingQuote.cost │
/// │  default_rate_per_kg ───┘                                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use shiprate_core::money::Money;
    ///
    /// let charge = Money::from_cents(30000); // Represents 300.00
    /// assert_eq!(charge.cents(), 30000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount in major units ("300", "802.5", "802.50").
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - At most two decimal places (no silent rounding of input)
    ///
    /// ## Example
    /// ```rust
    /// use shiprate_core::money::Money;
    ///
    /// assert_eq!(Money::parse("300").unwrap().cents(), 30000);
    /// assert_eq!(Money::parse("0.5").unwrap().cents(), 50);
    /// assert!(Money::parse("1.005").is_err());
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        parse_scaled(input, 2, "amount").map(Money)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Charges this per-kilogram rate for a weight.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP, ONCE                                                │
    /// │                                                                     │
    /// │  exact   = rate_cents × grams          (units: cent·gram)           │
    /// │  charge  = (exact + 500) / 1000        (units: cent)                │
    /// │                                                                     │
    /// │  0.5 of a cent always goes up: 1.005 → 1.01, 2.675 → 2.68           │
    /// │  Negative products round half away from zero (symmetry).            │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Validated rates and weights (see [`crate::MAX_AMOUNT_CENTS`] and
    /// [`crate::MAX_WEIGHT_GRAMS`]) always fit. Anything larger saturates at
    /// the i64 bounds instead of wrapping.
    ///
    /// ## Example
    /// ```rust
    /// use shiprate_core::money::Money;
    /// use shiprate_core::weight::Weight;
    ///
    /// // 0.01/kg × 0.5 kg = 0.005 → 0.01
    /// let cost = Money::from_cents(1).charge_for_weight(Weight::from_grams(500));
    /// assert_eq!(cost.cents(), 1);
    /// ```
    pub fn charge_for_weight(&self, weight: Weight) -> Money {
        // i128: cents × grams can exceed i64 before the division
        let exact = self.0 as i128 * weight.grams() as i128;
        let half = (Weight::GRAMS_PER_KG / 2) as i128;
        let per_kg = Weight::GRAMS_PER_KG as i128;

        let rounded = if exact >= 0 {
            (exact + half) / per_kg
        } else {
            (exact - half) / per_kg
        };

        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity, saturating on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use shiprate_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(29900);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 89700);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// Parses a non-exponent decimal string into an integer scaled by 10^places.
///
/// Shared by [`Money::parse`] (2 places) and [`Weight::parse_kg`] (3 places).
pub(crate) fn parse_scaled(input: &str, places: u32, field: &str) -> Result<i64, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason,
    };

    let text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::required(field));
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("'{}' is not a decimal number", text)));
    }
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("'{}' is not a decimal number", text)));
    }
    if fraction.len() > places as usize {
        return Err(invalid(format!("at most {} decimal places allowed", places)));
    }

    let scale = 10_i64.pow(places);
    let padding = 10_i64.pow(places - fraction.len() as u32);
    let too_large = || invalid(format!("'{}' is too large", text));

    let whole: i64 = whole.parse().map_err(|_| too_large())?;
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        fraction.parse::<i64>().map_err(|_| too_large())? * padding
    };

    let value = whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction))
        .ok_or_else(too_large)?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money in major units with exactly two decimals ("802.50").
///
/// ## Note
/// No currency symbol: currency presentation belongs to the storefront.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturating: a sum past i64::MAX stays there and fails validation.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
