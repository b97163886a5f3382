//! # Shipping Resolver
//!
//! Turns a shipping request and a snapshot of reference data into one price.
//!
//! ## Fallback Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        resolve(data, request)                           │
//! │                                                                         │
//! │  0. validate request ── cart_total < 0, weight ≤ 0 ──► Err             │
//! │                                                                         │
//! │  1. country detection                                                   │
//! │     postal code given? ──► PostalLookup ── hit ──► (country, zone?)    │
//! │            │                          └── miss ─► (declared, None)     │
//! │            └── no ───────────────────────────────► (declared, None)    │
//! │     country blank ──► Err(country is required)                         │
//! │                                                                         │
//! │  2. country == home && zone? ──► ZoneRateTable ── Some ──► "zone"      │
//! │                                                                         │
//! │  3. CountryRateTable(country) ─────────────────── Some ──► "country"   │
//! │                                                                         │
//! │  4. max(default_rate × weight, default_min) ──────────────► "fallback" │
//! │                                                                         │
//! │  Each step runs at most once. Step 4 cannot fail.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver holds only settings. Reference data is passed in on every
//! call, so the same resolver can be shared across threads.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::country::{price_entry, CountryRateTable};
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::postal::PostalLookup;
use crate::validation::{validate_cart_total_cents, validate_weight_grams, ValidationResult};
use crate::weight::Weight;
use crate::zone::ZoneRateTable;
use crate::{DEFAULT_HOME_COUNTRY, DEFAULT_MIN_CHARGE_CENTS, DEFAULT_RATE_PER_KG_CENTS};

// =============================================================================
// Settings
// =============================================================================

/// Knobs of the fallback chain.
///
/// Deserialized from the `[shipping]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Country whose orders are priced by zone.
    pub home_country: String,

    /// Price per kilogram when nothing else matches.
    pub default_rate_per_kg_cents: i64,

    /// Floor for the fallback price.
    pub default_min_charge_cents: i64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        ResolverSettings {
            home_country: DEFAULT_HOME_COUNTRY.to_string(),
            default_rate_per_kg_cents: DEFAULT_RATE_PER_KG_CENTS,
            default_min_charge_cents: DEFAULT_MIN_CHARGE_CENTS,
        }
    }
}

impl ResolverSettings {
    pub fn default_rate_per_kg(&self) -> Money {
        Money::from_cents(self.default_rate_per_kg_cents)
    }

    pub fn default_min_charge(&self) -> Money {
        Money::from_cents(self.default_min_charge_cents)
    }
}

// =============================================================================
// Request
// =============================================================================

/// What the checkout asks: how much to ship this cart there?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingRequest {
    pub cart_total_cents: i64,

    /// Country the customer typed. Overridden by a known postal code.
    pub declared_country: String,

    pub postal_code: Option<String>,

    pub total_weight_grams: i64,
}

impl ShippingRequest {
    pub fn new(cart_total: Money, declared_country: &str, total_weight: Weight) -> Self {
        ShippingRequest {
            cart_total_cents: cart_total.cents(),
            declared_country: declared_country.to_string(),
            postal_code: None,
            total_weight_grams: total_weight.grams(),
        }
    }

    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    #[inline]
    pub fn cart_total(&self) -> Money {
        Money::from_cents(self.cart_total_cents)
    }

    #[inline]
    pub fn total_weight(&self) -> Weight {
        Weight::from_grams(self.total_weight_grams)
    }

    /// The postal code to look up. An empty string counts as absent.
    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref().filter(|code| !code.is_empty())
    }

    /// Checks the numeric fields. The country is checked after postal lookup,
    /// since a known postal code supplies one.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_cart_total_cents(self.cart_total_cents)?;
        validate_weight_grams(self.total_weight_grams)?;
        Ok(())
    }
}

// =============================================================================
// Quote
// =============================================================================

/// Which step of the fallback chain priced the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MatchedRule {
    Zone,
    Country,
    Fallback,
}

impl MatchedRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchedRule::Zone => "zone",
            MatchedRule::Country => "country",
            MatchedRule::Fallback => "fallback",
        }
    }
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The priced answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingQuote {
    pub cost_cents: i64,

    /// Country after postal lookup.
    pub resolved_country: String,

    /// Set when the zone table priced the order.
    pub zone_used: Option<String>,

    pub matched_rule: MatchedRule,

    /// Name of the winning country rate entry.
    pub rate_name: Option<String>,

    /// Whether the postal code was found in the lookup table.
    pub postal_code_found: bool,
}

impl ShippingQuote {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    pub fn is_free(&self) -> bool {
        self.cost().is_zero()
    }
}

// =============================================================================
// Reference Data Snapshot
// =============================================================================

/// Everything the resolver reads, loaded fresh for each call.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub postal: PostalLookup,
    pub zones: ZoneRateTable,
    pub rates: CountryRateTable,
}

impl ReferenceData {
    pub fn new(postal: PostalLookup, zones: ZoneRateTable, rates: CountryRateTable) -> Self {
        ReferenceData {
            postal,
            zones,
            rates,
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ShippingResolver {
    settings: ResolverSettings,
}

impl ShippingResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        ShippingResolver { settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Prices one request. See the module docs for the chain.
    ///
    /// ## Errors
    /// Only invalid input: negative cart total, non-positive weight, or a
    /// blank country that no postal code fills in.
    pub fn resolve(&self, data: &ReferenceData, request: &ShippingRequest) -> CoreResult<ShippingQuote> {
        request.validate()?;

        let cart_total = request.cart_total();
        let weight = request.total_weight();

        // 1. Country detection
        let postal_match = request.postal_code().and_then(|code| data.postal.resolve(code));
        let postal_code_found = postal_match.is_some();
        let (country, zone) = match postal_match {
            Some(found) => (found.country, found.zone),
            None => (request.declared_country.as_str(), None),
        };

        if country.trim().is_empty() {
            return Err(ValidationError::required("country").into());
        }

        let quote = |cost: Money, rule: MatchedRule, zone_used: Option<&str>, rate_name: Option<&str>| {
            ShippingQuote {
                cost_cents: cost.cents(),
                resolved_country: country.to_string(),
                zone_used: zone_used.map(str::to_string),
                matched_rule: rule,
                rate_name: rate_name.map(str::to_string),
                postal_code_found,
            }
        };

        // 2. Domestic zone
        if country == self.settings.home_country {
            if let Some(zone) = zone {
                if let Some(cost) = data.zones.rate_for(zone, cart_total, weight) {
                    return Ok(quote(cost, MatchedRule::Zone, Some(zone), None));
                }
            }
        }

        // 3. Country table
        if let Some(entry) = data.rates.select(country, cart_total) {
            let cost = price_entry(entry, weight);
            return Ok(quote(cost, MatchedRule::Country, None, Some(entry.name.as_str())));
        }

        // 4. Global fallback
        let cost = self
            .settings
            .default_rate_per_kg()
            .charge_for_weight(weight)
            .max(self.settings.default_min_charge());

        Ok(quote(cost, MatchedRule::Fallback, None, None))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::{PostalRecord, RateEntry, ZoneEntry};

    fn money(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    fn grams(g: i64) -> Weight {
        Weight::from_grams(g)
    }

    /// A small world: one domestic zone, two international rate sets.
    fn reference_data() -> ReferenceData {
        ReferenceData::new(
            PostalLookup::new(vec![
                PostalRecord::new("110001", "India").with_zone("north"),
                PostalRecord::new("700001", "India").with_zone("east"),
                PostalRecord::new("560001", "India"),
                PostalRecord::new("10115", "Germany").with_city("Berlin"),
                PostalRecord::new("44600", "Nepal").with_zone("north"),
            ]),
            ZoneRateTable::new(vec![
                ZoneEntry::new("north", money(4000), money(50000)),
                ZoneEntry::new("east", money(6000), money(50000)).inactive(),
            ]),
            CountryRateTable::new(vec![
                RateEntry::new("Germany Standard", "Germany", money(53500))
                    .with_min_charge(money(30000)),
                RateEntry::new("France Standard", "France", money(56500))
                    .with_min_charge(money(32000)),
                RateEntry::new("India Surface", "India", money(7000))
                    .with_min_charge(money(5000)),
            ]),
        )
    }

    fn resolve(request: &ShippingRequest) -> ShippingQuote {
        ShippingResolver::default()
            .resolve(&reference_data(), request)
            .unwrap()
    }

    // -------------------------------------------------------------------------
    // Scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn test_domestic_zone_weight_priced() {
        let request =
            ShippingRequest::new(money(30000), "India", grams(2000)).with_postal_code("110001");
        let quote = resolve(&request);

        assert_eq!(quote.cost_cents, 8000);
        assert_eq!(quote.matched_rule, MatchedRule::Zone);
        assert_eq!(quote.zone_used.as_deref(), Some("north"));
        assert_eq!(quote.resolved_country, "India");
        assert!(quote.postal_code_found);
    }

    #[test]
    fn test_domestic_zone_free_above_threshold() {
        let request =
            ShippingRequest::new(money(60000), "India", grams(2000)).with_postal_code("110001");
        let quote = resolve(&request);

        assert_eq!(quote.cost_cents, 0);
        assert!(quote.is_free());
        assert_eq!(quote.matched_rule, MatchedRule::Zone);
    }

    #[test]
    fn test_country_table_priced() {
        let request = ShippingRequest::new(money(10000), "Germany", grams(1500));
        let quote = resolve(&request);

        assert_eq!(quote.cost_cents, 80250);
        assert_eq!(quote.cost().to_string(), "802.50");
        assert_eq!(quote.matched_rule, MatchedRule::Country);
        assert_eq!(quote.rate_name.as_deref(), Some("Germany Standard"));
        assert!(!quote.postal_code_found);
    }

    #[test]
    fn test_unknown_country_uses_default_formula() {
        let request = ShippingRequest::new(money(10000), "Nowhere", grams(3000));
        let quote = resolve(&request);

        assert_eq!(quote.cost_cents, 15000);
        assert_eq!(quote.matched_rule, MatchedRule::Fallback);
        assert_eq!(quote.rate_name, None);
    }

    #[test]
    fn test_unknown_postal_code_keeps_declared_country() {
        let request =
            ShippingRequest::new(money(10000), "France", grams(1000)).with_postal_code("75999");
        let quote = resolve(&request);

        assert_eq!(quote.resolved_country, "France");
        assert_eq!(quote.matched_rule, MatchedRule::Country);
        assert_eq!(quote.rate_name.as_deref(), Some("France Standard"));
        assert_eq!(quote.cost_cents, 56500);
        assert!(!quote.postal_code_found);
    }

    // -------------------------------------------------------------------------
    // Chain edges
    // -------------------------------------------------------------------------

    #[test]
    fn test_postal_code_overrides_declared_country() {
        let request =
            ShippingRequest::new(money(10000), "France", grams(1000)).with_postal_code("10115");
        let quote = resolve(&request);

        assert_eq!(quote.resolved_country, "Germany");
        assert_eq!(quote.rate_name.as_deref(), Some("Germany Standard"));
    }

    #[test]
    fn test_inactive_zone_falls_to_country_table() {
        let request =
            ShippingRequest::new(money(10000), "India", grams(1000)).with_postal_code("700001");
        let quote = resolve(&request);

        assert_eq!(quote.matched_rule, MatchedRule::Country);
        assert_eq!(quote.rate_name.as_deref(), Some("India Surface"));
        assert_eq!(quote.cost_cents, 7000);
        assert_eq!(quote.zone_used, None);
    }

    #[test]
    fn test_home_country_without_zone_skips_zone_path() {
        // Known code, no zone; declared country alone never selects a zone.
        let with_code =
            ShippingRequest::new(money(10000), "India", grams(500)).with_postal_code("560001");
        let without_code = ShippingRequest::new(money(10000), "India", grams(500));

        for request in [with_code, without_code] {
            let quote = resolve(&request);
            assert_eq!(quote.matched_rule, MatchedRule::Country);
            // 70.00 × 0.5 = 35.00 < 50.00 minimum
            assert_eq!(quote.cost_cents, 5000);
        }
    }

    #[test]
    fn test_zone_outside_home_country_is_ignored() {
        let request =
            ShippingRequest::new(money(10000), "India", grams(1000)).with_postal_code("44600");
        let quote = resolve(&request);

        assert_eq!(quote.resolved_country, "Nepal");
        assert_eq!(quote.matched_rule, MatchedRule::Fallback);
        assert_eq!(quote.cost_cents, 10000);
    }

    #[test]
    fn test_dangling_zone_reference_falls_through() {
        let mut data = reference_data();
        data.postal
            .insert(PostalRecord::new("400001", "India").with_zone("west"));

        let request =
            ShippingRequest::new(money(10000), "India", grams(1000)).with_postal_code("400001");
        let quote = ShippingResolver::default().resolve(&data, &request).unwrap();

        assert_eq!(quote.matched_rule, MatchedRule::Country);
    }

    #[test]
    fn test_fallback_minimum_and_weight_charge() {
        // 50.00 × 1 kg = 50.00 < 100.00
        let light = resolve(&ShippingRequest::new(money(0), "Atlantis", grams(1000)));
        assert_eq!(light.cost_cents, 10000);

        // 50.00 × 2.345 kg = 117.25
        let heavy = resolve(&ShippingRequest::new(money(0), "Atlantis", grams(2345)));
        assert_eq!(heavy.cost_cents, 11725);
    }

    #[test]
    fn test_empty_postal_code_is_absent() {
        let request = ShippingRequest::new(money(10000), "Germany", grams(1500)).with_postal_code("");
        let quote = resolve(&request);

        assert_eq!(quote.resolved_country, "Germany");
        assert!(!quote.postal_code_found);
    }

    #[test]
    fn test_custom_settings() {
        let resolver = ShippingResolver::new(ResolverSettings {
            home_country: "Nepal".to_string(),
            default_rate_per_kg_cents: 1000,
            default_min_charge_cents: 0,
        });
        let data = reference_data();

        // Nepal is home now, and its postal record points at an active zone.
        let nepal = ShippingRequest::new(money(10000), "", grams(1000)).with_postal_code("44600");
        let quote = resolver.resolve(&data, &nepal).unwrap();
        assert_eq!(quote.matched_rule, MatchedRule::Zone);
        assert_eq!(quote.cost_cents, 4000);

        // India zones are no longer consulted.
        let india = ShippingRequest::new(money(30000), "India", grams(2000)).with_postal_code("110001");
        let quote = resolver.resolve(&data, &india).unwrap();
        assert_eq!(quote.matched_rule, MatchedRule::Country);

        let nowhere = ShippingRequest::new(money(0), "Nowhere", grams(1500));
        assert_eq!(resolver.resolve(&data, &nowhere).unwrap().cost_cents, 1500);
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_is_idempotent() {
        let data = reference_data();
        let resolver = ShippingResolver::default();
        let request =
            ShippingRequest::new(money(30000), "India", grams(2000)).with_postal_code("110001");

        let first = resolver.resolve(&data, &request).unwrap();
        let second = resolver.resolve(&data, &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cost_never_negative() {
        let data = reference_data();
        let resolver = ShippingResolver::default();
        let countries = ["India", "Germany", "France", "Nowhere"];
        let postals = [None, Some("110001"), Some("700001"), Some("10115"), Some("0")];

        for country in countries {
            for postal in postals {
                for total in [0, 1, 49999, 50000, 1_000_000] {
                    for weight in [1, 999, 1000, 25_000] {
                        let mut request = ShippingRequest::new(money(total), country, grams(weight));
                        if let Some(code) = postal {
                            request = request.with_postal_code(code);
                        }
                        let quote = resolver.resolve(&data, &request).unwrap();
                        assert!(quote.cost_cents >= 0, "{:?} -> {:?}", request, quote);
                    }
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    #[test]
    fn test_rejects_invalid_input() {
        let resolver = ShippingResolver::default();
        let data = reference_data();

        let negative_total = ShippingRequest::new(money(-1), "India", grams(1000));
        assert!(matches!(
            resolver.resolve(&data, &negative_total),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let zero_weight = ShippingRequest::new(money(100), "India", grams(0));
        assert!(matches!(
            resolver.resolve(&data, &zero_weight),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_rejects_weight_beyond_limit() {
        let resolver = ShippingResolver::new(ResolverSettings {
            default_rate_per_kg_cents: 53500,
            ..ResolverSettings::default()
        });
        let data = reference_data();

        // Unchecked, 535.00/kg × this weight overflows i64 cents.
        let absurd = ShippingRequest::new(money(10000), "Nowhere", grams(200_000_000_000_000_000));
        assert!(matches!(
            resolver.resolve(&data, &absurd),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        // Zone path has no minimum charge to mask a wrap.
        let domestic = ShippingRequest::new(money(0), "India", grams(crate::MAX_WEIGHT_GRAMS))
            .with_postal_code("110001");
        let quote = resolver.resolve(&data, &domestic).unwrap();
        assert_eq!(quote.matched_rule, MatchedRule::Zone);
        assert_eq!(quote.cost_cents, 4000 * (crate::MAX_WEIGHT_GRAMS / 1000));
    }

    #[test]
    fn test_zero_max_order_value_is_no_cap() {
        let data = ReferenceData::new(
            PostalLookup::default(),
            ZoneRateTable::default(),
            CountryRateTable::new(vec![RateEntry::new("France Standard", "France", money(56500))
                .with_min_charge(money(32000))
                .with_band(money(0), Some(money(0)))]),
        );

        let request = ShippingRequest::new(money(10000), "France", grams(1000));
        let quote = ShippingResolver::default().resolve(&data, &request).unwrap();

        assert_eq!(quote.matched_rule, MatchedRule::Country);
        assert_eq!(quote.cost_cents, 56500);
    }

    #[test]
    fn test_blank_country_needs_known_postal_code() {
        let resolver = ShippingResolver::default();
        let data = reference_data();

        let unknown = ShippingRequest::new(money(100), "  ", grams(1000)).with_postal_code("00000");
        assert!(matches!(
            resolver.resolve(&data, &unknown),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let none = ShippingRequest::new(money(100), "", grams(1000));
        assert!(resolver.resolve(&data, &none).is_err());

        let known = ShippingRequest::new(money(100), "", grams(1000)).with_postal_code("10115");
        assert_eq!(
            resolver.resolve(&data, &known).unwrap().resolved_country,
            "Germany"
        );
    }

    #[test]
    fn test_quote_json_shape() {
        let quote = resolve(&ShippingRequest::new(money(10000), "Germany", grams(1500)));
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["matched_rule"], "country");
        assert_eq!(json["cost_cents"], 80250);
        assert_eq!(json["zone_used"], serde_json::Value::Null);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: ResolverSettings =
            serde_json::from_str(r#"{ "home_country": "Nepal" }"#).unwrap();

        assert_eq!(settings.home_country, "Nepal");
        assert_eq!(settings.default_rate_per_kg_cents, DEFAULT_RATE_PER_KG_CENTS);
        assert_eq!(settings.default_min_charge_cents, DEFAULT_MIN_CHARGE_CENTS);
    }
}
