//! # Reference Data Types
//!
//! The rows administrators maintain and the resolver reads.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Reference Data                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  PostalRecord   │   │   ZoneEntry     │   │   RateEntry     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  postal_code    │──►│  zone (code)    │   │  name + country │       │
//! │  │  zone?          │   │  cost_per_kg    │   │  cost_per_kg    │       │
//! │  │  country        │   │  free threshold │   │  min charge     │       │
//! │  │  city, state    │   │  delivery_days  │   │  order band     │       │
//! │  └─────────────────┘   └─────────────────┘   │  priority       │       │
//! │     zone = None ⇒                            └─────────────────┘       │
//! │     international         domestic only          per country           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every row has:
//! - `id`: UUID v4 - immutable, used as the database primary key
//! - Natural key: (name, country), zone code or postal code - what bulk
//!   upserts match on

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Rate Entry
// =============================================================================

/// A country-scoped, weight-priced shipping rule.
///
/// ## Applicability Band
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  min_order_value ≤ cart_total ≤ max_order_value (None or 0 = no cap)   │
/// │                                                                         │
/// │  0 ─────────[ Standard (priority 1) ]──────────────────────────► ∞      │
/// │  0 ───[ Small (prio 1, max 999.99) ]                                    │
/// │             1000.00 ───[ Bulk (prio 1) ]───────────────────────► ∞      │
/// │                                                                         │
/// │  Ordered by (priority, min_order_value); the first survivor wins.      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RateEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, e.g. "Germany Standard".
    pub name: String,

    pub description: Option<String>,

    /// Destination country, matched exactly.
    pub country: String,

    /// Price per kilogram in cents.
    pub cost_per_kg_cents: i64,

    /// Floor applied after the weight charge.
    pub min_shipping_charge_cents: i64,

    /// Lowest cart total this entry applies to (inclusive).
    pub min_order_value_cents: i64,

    /// Highest cart total this entry applies to (inclusive). None or 0 = no cap.
    pub max_order_value_cents: Option<i64>,

    /// Stored for display. Never applied to international pricing.
    pub free_shipping_threshold_cents: Option<i64>,

    /// Lower is tried first.
    pub priority: i64,

    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl RateEntry {
    /// Creates an active entry with priority 1, no minimum charge and an
    /// unbounded order band.
    pub fn new(name: impl Into<String>, country: impl Into<String>, cost_per_kg: Money) -> Self {
        let now = Utc::now();
        RateEntry {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            country: country.into(),
            cost_per_kg_cents: cost_per_kg.cents(),
            min_shipping_charge_cents: 0,
            min_order_value_cents: 0,
            max_order_value_cents: None,
            free_shipping_threshold_cents: None,
            priority: 1,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_min_charge(mut self, min_charge: Money) -> Self {
        self.min_shipping_charge_cents = min_charge.cents();
        self
    }

    /// Sets the order-value band. `max = None` leaves it unbounded.
    pub fn with_band(mut self, min: Money, max: Option<Money>) -> Self {
        self.min_order_value_cents = min.cents();
        self.max_order_value_cents = max.map(|m| m.cents());
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_free_shipping_threshold(mut self, threshold: Money) -> Self {
        self.free_shipping_threshold_cents = Some(threshold.cents());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    #[inline]
    pub fn cost_per_kg(&self) -> Money {
        Money::from_cents(self.cost_per_kg_cents)
    }

    #[inline]
    pub fn min_charge(&self) -> Money {
        Money::from_cents(self.min_shipping_charge_cents)
    }

    /// The band's upper bound, if any. A stored zero means no cap.
    #[inline]
    pub fn max_order_value(&self) -> Option<Money> {
        self.max_order_value_cents
            .filter(|&max| max != 0)
            .map(Money::from_cents)
    }

    /// Checks the band's upper bound. The lower bound is the caller's filter.
    #[inline]
    pub fn within_max(&self, cart_total: Money) -> bool {
        match self.max_order_value() {
            Some(max) => cart_total <= max,
            None => true,
        }
    }
}

// =============================================================================
// Zone Entry
// =============================================================================

/// A domestic shipping region with its own per-kg rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ZoneEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Zone code, e.g. "north". Unique.
    pub zone: String,

    pub description: String,

    /// Price per kilogram in cents.
    pub cost_per_kg_cents: i64,

    /// Cart totals at or above this ship free.
    pub free_shipping_threshold_cents: i64,

    /// Delivery estimate for display, e.g. "3-5 business days".
    pub delivery_days: Option<String>,

    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ZoneEntry {
    pub fn new(
        zone: impl Into<String>,
        cost_per_kg: Money,
        free_shipping_threshold: Money,
    ) -> Self {
        let now = Utc::now();
        ZoneEntry {
            id: Uuid::new_v4().to_string(),
            zone: zone.into(),
            description: String::new(),
            cost_per_kg_cents: cost_per_kg.cents(),
            free_shipping_threshold_cents: free_shipping_threshold.cents(),
            delivery_days: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_delivery_days(mut self, days: impl Into<String>) -> Self {
        self.delivery_days = Some(days.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    #[inline]
    pub fn cost_per_kg(&self) -> Money {
        Money::from_cents(self.cost_per_kg_cents)
    }

    #[inline]
    pub fn free_shipping_threshold(&self) -> Money {
        Money::from_cents(self.free_shipping_threshold_cents)
    }
}

// =============================================================================
// Postal Record
// =============================================================================

/// Maps one postal code to a country and, for domestic codes, a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PostalRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Postal/ZIP code, stored exactly as entered. Unique.
    pub postal_code: String,

    /// Zone code. None for international codes.
    pub zone: Option<String>,

    pub country: String,

    pub city: Option<String>,

    pub state: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl PostalRecord {
    /// An international postal code (no zone).
    pub fn new(postal_code: impl Into<String>, country: impl Into<String>) -> Self {
        let now = Utc::now();
        PostalRecord {
            id: Uuid::new_v4().to_string(),
            postal_code: postal_code.into(),
            zone: None,
            country: country.into(),
            city: None,
            state: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}
