//! # Error Types
//!
//! Domain-specific error types for shiprate-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shiprate-core errors (this file)                                      │
//! │  ├── CoreError        - Domain errors (wraps validation)               │
//! │  └── ValidationError  - Input / reference-data validation failures     │
//! │                                                                         │
//! │  shiprate-db errors (separate crate)                                   │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ConfigError      - Config file / environment failures             │
//! │                                                                         │
//! │  NOT errors: unknown postal code, no matching rate row.                │
//! │  Those are absorbed by the resolver's fallback chain.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rate entry's order-value band is inverted (max below min).
    ///
    /// ## When This Occurs
    /// - Admin upsert of a rate with `max_order_value < min_order_value`
    #[error("Rate '{name}' has max order value {max_cents} below min order value {min_cents}")]
    InvalidBand {
        name: String,
        min_cents: i64,
        max_cents: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used both for shipping requests (caller contract violations) and for
/// reference data on its way into storage.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable amount, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value inside one bulk upsert.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
