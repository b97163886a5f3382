//! # Postal Lookup
//!
//! Resolves a raw postal code to the country it belongs to and, for domestic
//! codes, the shipping zone.
//!
//! Matching is exact. `"110001"` and `" 110001"` are different codes, and
//! `"sw1a1aa"` does not find `"SW1A1AA"`. A miss is not an error: the
//! resolver keeps the customer's declared country.

use std::collections::HashMap;

use crate::types::PostalRecord;

/// The part of a postal record the resolver acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostalMatch<'a> {
    pub country: &'a str,
    pub zone: Option<&'a str>,
}

/// Postal records indexed by code.
#[derive(Debug, Clone, Default)]
pub struct PostalLookup {
    records: HashMap<String, PostalRecord>,
}

impl PostalLookup {
    /// Indexes records by postal code. On duplicate codes the last one wins,
    /// which storage never produces (the column is unique).
    pub fn new(records: impl IntoIterator<Item = PostalRecord>) -> Self {
        PostalLookup {
            records: records
                .into_iter()
                .map(|r| (r.postal_code.clone(), r))
                .collect(),
        }
    }

    pub fn insert(&mut self, record: PostalRecord) {
        self.records.insert(record.postal_code.clone(), record);
    }

    pub fn resolve(&self, postal_code: &str) -> Option<PostalMatch<'_>> {
        self.records.get(postal_code).map(|r| PostalMatch {
            country: &r.country,
            zone: r.zone.as_deref(),
        })
    }

    pub fn get(&self, postal_code: &str) -> Option<&PostalRecord> {
        self.records.get(postal_code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
