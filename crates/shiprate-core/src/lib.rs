//! # shiprate-core: Pure Shipping Rules
//!
//! This crate is the **heart** of Shiprate. It decides what an order pays for
//! shipping, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shiprate Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Storefront / Checkout                          │   │
//! │  │      Cart ──► "Calculate shipping" ──► Order total              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ShippingRequest                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              shiprate-db (ShippingService)                      │   │
//! │  │    loads a ReferenceData snapshot from SQLite per request       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ &ReferenceData                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ shiprate-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  postal  │  │   zone   │  │ country  │  │   resolver   │   │   │
//! │  │   │  Lookup  │  │  Table   │  │  Table   │  │ fallback     │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  │ chain        │   │   │
//! │  │                                             └──────────────┘   │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`weight`] - Weight in whole grams
//! - [`types`] - Reference data rows (RateEntry, ZoneEntry, PostalRecord)
//! - [`cart`] - Cart snapshot → totals
//! - [`postal`] - PostalLookup
//! - [`zone`] - ZoneRateTable
//! - [`country`] - CountryRateTable
//! - [`resolver`] - ShippingResolver and its request/quote types
//! - [`error`] - Domain error types
//! - [`validation`] - Input and reference-data validation
//!
//! ## Example Usage
//!
//! ```rust
//! use shiprate_core::{
//!     CountryRateTable, PostalLookup, RateEntry, ReferenceData, ShippingRequest,
//!     ShippingResolver, ZoneRateTable, Money, Weight, MatchedRule,
//! };
//!
//! let data = ReferenceData::new(
//!     PostalLookup::default(),
//!     ZoneRateTable::default(),
//!     CountryRateTable::new(vec![
//!         RateEntry::new("Germany Standard", "Germany", Money::from_cents(53500))
//!             .with_min_charge(Money::from_cents(30000)),
//!     ]),
//! );
//!
//! let request = ShippingRequest::new(Money::from_cents(10000), "Germany", Weight::from_grams(1500));
//! let quote = ShippingResolver::default().resolve(&data, &request).unwrap();
//!
//! assert_eq!(quote.cost_cents, 80250); // 535.00/kg × 1.5 kg
//! assert_eq!(quote.matched_rule, MatchedRule::Country);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod country;
pub mod error;
pub mod money;
pub mod postal;
pub mod resolver;
pub mod types;
pub mod validation;
pub mod weight;
pub mod zone;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLine, CartSnapshot};
pub use country::CountryRateTable;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use postal::{PostalLookup, PostalMatch};
pub use resolver::{
    MatchedRule, ReferenceData, ResolverSettings, ShippingQuote, ShippingRequest,
    ShippingResolver,
};
pub use types::*;
pub use weight::Weight;
pub use zone::ZoneRateTable;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The country whose orders are priced by domestic zone.
pub const DEFAULT_HOME_COUNTRY: &str = "India";

/// Fallback price per kilogram when no zone or country rate applies (50.00).
pub const DEFAULT_RATE_PER_KG_CENTS: i64 = 5_000;

/// Fallback minimum charge when no zone or country rate applies (100.00).
pub const DEFAULT_MIN_CHARGE_CENTS: i64 = 10_000;

/// Largest amount accepted anywhere: rates, charges, cart totals (10^10 major units).
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

/// Largest weight accepted for a unit or a whole order (1,000 tonnes).
///
/// `MAX_AMOUNT_CENTS` per kg × this weight still fits in i64 cents.
pub const MAX_WEIGHT_GRAMS: i64 = 1_000_000_000;

/// Maximum quantity of a single line in a cart snapshot.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of a stored postal code.
pub const MAX_POSTAL_CODE_LEN: usize = 10;
