//! # Repository Module
//!
//! Database repository implementations for shipping reference data.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  ShippingService / seed binary                                         │
//! │       │                                                                 │
//! │       │  db.rates().list_active_for_country("Germany")                 │
//! │       ▼                                                                 │
//! │  RateRepository / ZoneRepository / PostalCodeRepository                │
//! │  ├── read queries the resolver needs                                   │
//! │  ├── upsert(&self, row)          ← match on the natural key            │
//! │  ├── bulk_upsert(&self, rows)    ← one transaction, {created, updated} │
//! │  └── set_active / delete / count                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Natural Keys
//! | Repository               | Natural key         |
//! |--------------------------|---------------------|
//! | [`rate::RateRepository`] | `(name, country)`   |
//! | [`zone::ZoneRepository`] | `zone`              |
//! | [`postal::PostalCodeRepository`] | `postal_code` |
//!
//! An upsert that finds an existing row keeps its `id` and `created_at` and
//! overwrites everything else.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use shiprate_core::ValidationError;

pub mod postal;
pub mod rate;
pub mod zone;

/// What a single upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Counts reported by a bulk upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    pub created: usize,
    pub updated: usize,
}

impl UpsertSummary {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.updated
    }
}

/// Rejects a batch that names the same natural key twice.
///
/// Inside one transaction the second row would silently overwrite the first.
pub(crate) fn ensure_unique_keys<K>(
    field: &str,
    keys: impl IntoIterator<Item = K>,
) -> Result<(), ValidationError>
where
    K: Eq + Hash + Display,
{
    let mut seen = HashSet::new();
    for key in keys {
        let shown = key.to_string();
        if !seen.insert(key) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: shown,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_record() {
        let mut summary = UpsertSummary::default();
        summary.record(UpsertOutcome::Created);
        summary.record(UpsertOutcome::Created);
        summary.record(UpsertOutcome::Updated);

        assert_eq!(summary, UpsertSummary { created: 2, updated: 1 });
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_ensure_unique_keys() {
        assert!(ensure_unique_keys("zone", ["north", "south"]).is_ok());

        match ensure_unique_keys("zone", ["north", "south", "north"]) {
            Err(ValidationError::Duplicate { field, value }) => {
                assert_eq!(field, "zone");
                assert_eq!(value, "north");
            }
            other => panic!("expected Duplicate, got {:?}", other),
        }
    }
}
