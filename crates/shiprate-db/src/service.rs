//! # Shipping Service
//!
//! Loads a reference-data snapshot for one request and hands it to the pure
//! resolver.
//!
//! ## Per-Request Snapshot
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ShippingRequest                                                        │
//! │       │                                                                 │
//! │       ├── postal_codes().get_by_code(code)      (0 or 1 row)           │
//! │       │        └── country override, zone?                              │
//! │       ├── zones().get_by_code(zone)             (home country only)    │
//! │       └── rates().list_active_for_country(c)    (one country)          │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          ReferenceData ──► ShippingResolver::resolve ──► ShippingQuote │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached: every call reads committed data. A rate edited while a
//! quote is in flight may or may not be seen.

use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use shiprate_core::{
    CartSnapshot, CountryRateTable, PostalLookup, ReferenceData, ResolverSettings, ShippingQuote,
    ShippingRequest, ShippingResolver, ZoneRateTable,
};

/// Quotes shipping against the database.
#[derive(Debug, Clone)]
pub struct ShippingService {
    db: Database,
    resolver: ShippingResolver,
}

impl ShippingService {
    pub fn new(db: Database, settings: ResolverSettings) -> Self {
        ShippingService {
            db,
            resolver: ShippingResolver::new(settings),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn settings(&self) -> &ResolverSettings {
        self.resolver.settings()
    }

    /// Loads just the rows this request can touch.
    pub async fn load_reference_data(&self, request: &ShippingRequest) -> DbResult<ReferenceData> {
        let mut data = ReferenceData::default();

        let postal = match request.postal_code() {
            Some(code) => self.db.postal_codes().get_by_code(code).await?,
            None => None,
        };

        let country = postal
            .as_ref()
            .map(|p| p.country.clone())
            .unwrap_or_else(|| request.declared_country.clone());

        if country == self.settings().home_country {
            if let Some(zone_code) = postal.as_ref().and_then(|p| p.zone.as_deref()) {
                if let Some(zone) = self.db.zones().get_by_code(zone_code).await? {
                    data.zones = ZoneRateTable::new(vec![zone]);
                }
            }
        }

        if !country.trim().is_empty() {
            data.rates = CountryRateTable::new(self.db.rates().list_active_for_country(&country).await?);
        }

        if let Some(record) = postal {
            data.postal = PostalLookup::new(vec![record]);
        }

        debug!(
            country = %country,
            postal_found = !data.postal.is_empty(),
            zones = data.zones.len(),
            rates = data.rates.entries().len(),
            "Loaded reference data"
        );
        Ok(data)
    }

    /// Prices one request.
    ///
    /// ## Returns
    /// * `Ok(ShippingQuote)` - Always, for valid input
    /// * `Err(DbError::Validation)` - Bad request (negative total, zero weight)
    /// * `Err(DbError::Core)` - Blank country with no known postal code
    pub async fn quote(&self, request: &ShippingRequest) -> DbResult<ShippingQuote> {
        request.validate()?;

        let data = self.load_reference_data(request).await?;
        let quote = self.resolver.resolve(&data, request)?;

        info!(
            matched_rule = %quote.matched_rule,
            resolved_country = %quote.resolved_country,
            zone = quote.zone_used.as_deref().unwrap_or("-"),
            cost_cents = quote.cost_cents,
            "Shipping quote resolved"
        );
        Ok(quote)
    }

    /// Prices a cart: sums its lines, then quotes.
    pub async fn quote_cart(
        &self,
        cart: &CartSnapshot,
        declared_country: &str,
        postal_code: Option<&str>,
    ) -> DbResult<ShippingQuote> {
        let request = cart.shipping_request(declared_country, postal_code)?;
        self.quote(&request).await
    }
}
