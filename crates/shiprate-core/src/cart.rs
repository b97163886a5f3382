//! # Cart Snapshot
//!
//! The checkout's view of a cart: just enough to price shipping.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartLine { unit_weight, quantity, unit_price }  × N                    │
//! │       │                                                                 │
//! │       ├── total_weight = Σ unit_weight × quantity                       │
//! │       └── total_value  = Σ unit_price  × quantity                       │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  shipping_request(country, postal) ──► ShippingRequest                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot is rebuilt for every request and never stored.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::resolver::ShippingRequest;
use crate::validation::{
    validate_amount_cents, validate_cart_total_cents, validate_quantity, ValidationResult,
};
use crate::weight::Weight;
use crate::MAX_WEIGHT_GRAMS;

/// One line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub unit_weight: Weight,
    pub quantity: i64,
    pub unit_price: Money,
}

impl CartLine {
    pub fn new(unit_weight: Weight, quantity: i64, unit_price: Money) -> Self {
        CartLine {
            unit_weight,
            quantity,
            unit_price,
        }
    }

    #[inline]
    pub fn line_weight(&self) -> Weight {
        self.unit_weight.multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)?;
        validate_amount_cents("unit_price", self.unit_price.cents())?;
        if !(0..=MAX_WEIGHT_GRAMS).contains(&self.unit_weight.grams()) {
            return Err(ValidationError::OutOfRange {
                field: "unit_weight".to_string(),
                min: 0,
                max: MAX_WEIGHT_GRAMS,
            });
        }
        Ok(())
    }
}

/// An ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    pub fn new(lines: Vec<CartLine>) -> Self {
        CartSnapshot { lines }
    }

    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_weight(&self) -> Weight {
        self.lines.iter().map(CartLine::line_weight).sum()
    }

    pub fn total_value(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Builds the shipping request for this cart.
    ///
    /// Every line is validated first, then the totals are bounded. A zero
    /// total weight is left to the resolver, which reports it as a weight
    /// error.
    ///
    /// ## Example
    /// ```rust
    /// use shiprate_core::{CartLine, CartSnapshot, Money, Weight};
    ///
    /// let cart = CartSnapshot::new(vec![
    ///     CartLine::new(Weight::from_grams(500), 2, Money::from_cents(12500)),
    ///     CartLine::new(Weight::from_grams(1000), 1, Money::from_cents(5000)),
    /// ]);
    ///
    /// let request = cart.shipping_request("India", Some("110001")).unwrap();
    /// assert_eq!(request.total_weight_grams, 2000);
    /// assert_eq!(request.cart_total_cents, 30000);
    /// ```
    pub fn shipping_request(
        &self,
        declared_country: &str,
        postal_code: Option<&str>,
    ) -> ValidationResult<ShippingRequest> {
        for line in &self.lines {
            line.validate()?;
        }

        let total_value = self.total_value();
        let total_weight = self.total_weight();

        validate_cart_total_cents(total_value.cents())?;
        if total_weight.grams() > MAX_WEIGHT_GRAMS {
            return Err(ValidationError::OutOfRange {
                field: "total_weight".to_string(),
                min: 1,
                max: MAX_WEIGHT_GRAMS,
            });
        }

        let mut request = ShippingRequest::new(total_value, declared_country, total_weight);
        if let Some(code) = postal_code {
            request = request.with_postal_code(code);
        }
        Ok(request)
    }
}

impl FromIterator<CartLine> for CartSnapshot {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        CartSnapshot {
            lines: iter.into_iter().collect(),
        }
    }
}
