//! # Country Rate Table
//!
//! Per-country pricing with priority ordering and order-value bands.
//!
//! ## Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. keep      is_active && country == target && min_order ≤ total      │
//! │  2. order by  (priority ASC, min_order_value ASC), stable              │
//! │  3. skip      max_order set (non-zero) && total > max_order            │
//! │  4. first     max(cost_per_kg × weight, min_charge)                    │
//! │                                                                         │
//! │  No survivor ⇒ None, and the resolver falls back to the default rate.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ordering is an in-memory filter over the loaded entries, not a query,
//! so ties are broken the same way on every call: equal keys keep load order.
//!
//! `free_shipping_threshold_cents` is never read here. International orders
//! always pay shipping.

use crate::money::Money;
use crate::types::RateEntry;
use crate::weight::Weight;

#[derive(Debug, Clone, Default)]
pub struct CountryRateTable {
    entries: Vec<RateEntry>,
}

impl CountryRateTable {
    pub fn new(entries: Vec<RateEntry>) -> Self {
        CountryRateTable { entries }
    }

    pub fn push(&mut self, entry: RateEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    /// Picks the entry that prices an order of `cart_total` to `country`.
    pub fn select(&self, country: &str, cart_total: Money) -> Option<&RateEntry> {
        let mut candidates: Vec<&RateEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_active && e.country == country)
            .filter(|e| e.min_order_value_cents <= cart_total.cents())
            .collect();

        // sort_by_key is stable
        candidates.sort_by_key(|e| (e.priority, e.min_order_value_cents));

        candidates.into_iter().find(|e| e.within_max(cart_total))
    }

    pub fn rate_for(&self, country: &str, cart_total: Money, total_weight: Weight) -> Option<Money> {
        self.select(country, cart_total)
            .map(|entry| price_entry(entry, total_weight))
    }
}

/// Weight charge with the entry's minimum applied.
pub fn price_entry(entry: &RateEntry, total_weight: Weight) -> Money {
    entry
        .cost_per_kg()
        .charge_for_weight(total_weight)
        .max(entry.min_charge())
}
