//! # Validation Module
//!
//! Input and reference-data validation for Shiprate.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Read path (every quote)                                                │
//! │  ├── ShippingRequest::validate() ← request fields only                 │
//! │  └── Reference data is trusted: it was checked on the way in           │
//! │                                                                         │
//! │  Write path (admin upserts, seed)                                       │
//! │  ├── validate_rate_entry / validate_zone_entry / validate_postal_record│
//! │  │   ← THIS MODULE                                                      │
//! │  └── SQLite: NOT NULL, UNIQUE, FOREIGN KEY (zone → shipping_zones)     │
//! │                                                                         │
//! │  Misconfiguration is rejected at write time, never re-checked on read. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shiprate_core::validation::{validate_postal_code, validate_weight_grams};
//!
//! validate_postal_code("110001").unwrap();
//! assert!(validate_weight_grams(0).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{PostalRecord, RateEntry, ZoneEntry};
use crate::{MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY, MAX_POSTAL_CODE_LEN, MAX_WEIGHT_GRAMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;
const MAX_COUNTRY_LEN: usize = 100;
const MAX_ZONE_CODE_LEN: usize = 50;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a country name.
///
/// ## Rules
/// - Must not be blank
/// - At most 100 characters
pub fn validate_country(country: &str) -> ValidationResult<()> {
    let country = country.trim();

    if country.is_empty() {
        return Err(ValidationError::required("country"));
    }

    if country.chars().count() > MAX_COUNTRY_LEN {
        return Err(ValidationError::TooLong {
            field: "country".to_string(),
            max: MAX_COUNTRY_LEN,
        });
    }

    Ok(())
}

/// Validates a postal code for storage.
///
/// ## Rules
/// - Must not be blank
/// - At most 10 characters
///
/// No normalization: the code is stored and matched exactly as given.
///
/// ## Example
/// ```rust
/// use shiprate_core::validation::validate_postal_code;
///
/// assert!(validate_postal_code("SW1A1AA").is_ok());
/// assert!(validate_postal_code("").is_err());
/// assert!(validate_postal_code("12345678901").is_err());
/// ```
pub fn validate_postal_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::required("postal_code"));
    }

    if code.chars().count() > MAX_POSTAL_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "postal_code".to_string(),
            max: MAX_POSTAL_CODE_LEN,
        });
    }

    Ok(())
}

/// Validates a zone code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, numbers, hyphens and underscores
///
/// ## Example
/// ```rust
/// use shiprate_core::validation::validate_zone_code;
///
/// assert!(validate_zone_code("north").is_ok());
/// assert!(validate_zone_code("north east").is_err());
/// ```
pub fn validate_zone_code(zone: &str) -> ValidationResult<()> {
    if zone.is_empty() {
        return Err(ValidationError::required("zone"));
    }

    if zone.len() > MAX_ZONE_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "zone".to_string(),
            max: MAX_ZONE_CODE_LEN,
        });
    }

    if !zone
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "zone".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a rate name.
///
/// ## Rules
/// - Must not be blank
/// - At most 100 characters
pub fn validate_rate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stored amount in cents (cost, charge, threshold, band edge).
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free zone, no minimum charge)
/// - At most MAX_AMOUNT_CENTS
///
/// ## Example
/// ```rust
/// use shiprate_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("cost_per_kg", 4000).is_ok());
/// assert!(validate_amount_cents("cost_per_kg", 0).is_ok());
/// assert!(validate_amount_cents("cost_per_kg", -1).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates a cart total. Zero is a valid total.
pub fn validate_cart_total_cents(cents: i64) -> ValidationResult<()> {
    validate_amount_cents("cart_total", cents)
}

/// Validates a total weight.
///
/// ## Rules
/// - Must be positive (> 0); an empty parcel has no shipping price
/// - At most MAX_WEIGHT_GRAMS
pub fn validate_weight_grams(grams: i64) -> ValidationResult<()> {
    if grams <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "total_weight".to_string(),
        });
    }

    if grams > MAX_WEIGHT_GRAMS {
        return Err(ValidationError::OutOfRange {
            field: "total_weight".to_string(),
            min: 1,
            max: MAX_WEIGHT_GRAMS,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use shiprate_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a rate entry before it is written.
///
/// ## Checks
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  name, country        not blank, length limits                          │
/// │  cost / min charge    >= 0                                              │
/// │  band                 min >= 0, max >= min (else InvalidBand), 0 = none │
/// │  free threshold       >= 0 when present                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_rate_entry(rate: &RateEntry) -> CoreResult<()> {
    validate_uuid(&rate.id)?;
    validate_rate_name(&rate.name)?;
    validate_country(&rate.country)?;
    validate_amount_cents("cost_per_kg", rate.cost_per_kg_cents)?;
    validate_amount_cents("min_shipping_charge", rate.min_shipping_charge_cents)?;
    validate_amount_cents("min_order_value", rate.min_order_value_cents)?;

    if let Some(threshold) = rate.free_shipping_threshold_cents {
        validate_amount_cents("free_shipping_threshold", threshold)?;
    }

    if let Some(max) = rate.max_order_value() {
        if max.cents() < rate.min_order_value_cents {
            return Err(CoreError::InvalidBand {
                name: rate.name.clone(),
                min_cents: rate.min_order_value_cents,
                max_cents: max.cents(),
            });
        }
    }

    Ok(())
}

/// Validates a zone entry before it is written.
pub fn validate_zone_entry(zone: &ZoneEntry) -> CoreResult<()> {
    validate_uuid(&zone.id)?;
    validate_zone_code(&zone.zone)?;
    validate_amount_cents("cost_per_kg", zone.cost_per_kg_cents)?;
    validate_amount_cents("free_shipping_threshold", zone.free_shipping_threshold_cents)?;
    Ok(())
}

/// Validates a postal record before it is written.
///
/// Whether the referenced zone exists is left to the foreign key.
pub fn validate_postal_record(record: &PostalRecord) -> CoreResult<()> {
    validate_uuid(&record.id)?;
    validate_postal_code(&record.postal_code)?;
    validate_country(&record.country)?;

    if let Some(zone) = &record.zone {
        validate_zone_code(zone)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
