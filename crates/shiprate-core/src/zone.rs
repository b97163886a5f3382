//! # Zone Rate Table
//!
//! Domestic pricing by zone.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rate_for(zone, cart_total, weight)                                     │
//! │                                                                         │
//! │  zone unknown or inactive ──────────────────────► None (fall through)  │
//! │  cart_total ≥ free_shipping_threshold ──────────► 0.00                  │
//! │  otherwise ─────────────────────────────────────► cost_per_kg × weight  │
//! │                                                   (one half-up round)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Zones have no minimum charge.

use std::collections::HashMap;

use crate::money::Money;
use crate::types::ZoneEntry;
use crate::weight::Weight;

#[derive(Debug, Clone, Default)]
pub struct ZoneRateTable {
    zones: HashMap<String, ZoneEntry>,
}

impl ZoneRateTable {
    pub fn new(zones: impl IntoIterator<Item = ZoneEntry>) -> Self {
        ZoneRateTable {
            zones: zones.into_iter().map(|z| (z.zone.clone(), z)).collect(),
        }
    }

    pub fn insert(&mut self, zone: ZoneEntry) {
        self.zones.insert(zone.zone.clone(), zone);
    }

    /// Returns the zone if it exists and is active.
    pub fn active_zone(&self, zone: &str) -> Option<&ZoneEntry> {
        self.zones.get(zone).filter(|z| z.is_active)
    }

    pub fn rate_for(&self, zone: &str, cart_total: Money, total_weight: Weight) -> Option<Money> {
        let entry = self.active_zone(zone)?;

        if cart_total >= entry.free_shipping_threshold() {
            return Some(Money::zero());
        }

        Some(entry.cost_per_kg().charge_for_weight(total_weight))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ZoneRateTable {
        ZoneRateTable::new(vec![
            ZoneEntry::new("north", Money::from_cents(4000), Money::from_cents(50000)),
            ZoneEntry::new("east", Money::from_cents(6000), Money::from_cents(50000)).inactive(),
        ])
    }

    #[test]
    fn test_weight_priced_below_threshold() {
        let cost = table().rate_for("north", Money::from_cents(30000), Weight::from_grams(2000));
        assert_eq!(cost, Some(Money::from_cents(8000)));
    }

    #[test]
    fn test_free_at_and_above_threshold() {
        let table = table();
        let heavy = Weight::from_grams(25_000);

        assert_eq!(
            table.rate_for("north", Money::from_cents(50000), heavy),
            Some(Money::zero())
        );
        assert_eq!(
            table.rate_for("north", Money::from_cents(60000), heavy),
            Some(Money::zero())
        );
        // One cent short still pays.
        assert_eq!(
            table.rate_for("north", Money::from_cents(49999), heavy),
            Some(Money::from_cents(100000))
        );
    }

    #[test]
    fn test_unknown_or_inactive_zone() {
        let table = table();
        let w = Weight::from_grams(1000);

        assert_eq!(table.rate_for("west", Money::zero(), w), None);
        assert_eq!(table.rate_for("east", Money::zero(), w), None);
        assert!(table.active_zone("east").is_none());
    }

    #[test]
    fn test_no_minimum_charge() {
        let cost = table().rate_for("north", Money::zero(), Weight::from_grams(1));
        assert_eq!(cost, Some(Money::zero()));
    }
}
