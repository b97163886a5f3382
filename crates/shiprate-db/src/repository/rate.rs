//! # Rate Repository
//!
//! Database operations for country shipping rates.
//!
//! ## Key Operations
//! - Load the active rates for one country (the resolver's only read)
//! - Update-or-insert by `(name, country)`, singly or in bulk
//! - Activate/deactivate and delete
//!
//! ## Read Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ORDER BY priority, min_order_value_cents, rowid                        │
//! │                                                                         │
//! │  The selection itself happens in CountryRateTable::select. rowid makes │
//! │  load order deterministic, so full ties resolve the same way on every  │
//! │  call.                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{ensure_unique_keys, UpsertOutcome, UpsertSummary};
use shiprate_core::validation::validate_rate_entry;
use shiprate_core::RateEntry;

const SELECT_RATE: &str = r#"
    SELECT
        id,
        name,
        description,
        country,
        cost_per_kg_cents,
        min_shipping_charge_cents,
        min_order_value_cents,
        max_order_value_cents,
        free_shipping_threshold_cents,
        priority,
        is_active,
        created_at,
        updated_at
    FROM shipping_rates
"#;

/// Repository for country rate database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = RateRepository::new(pool);
///
/// let germany = repo.list_active_for_country("Germany").await?;
/// let summary = repo.bulk_upsert(&rates).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RateRepository {
    pool: SqlitePool,
}

impl RateRepository {
    /// Creates a new RateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RateRepository { pool }
    }

    /// Lists the active rates for one country in selection order.
    pub async fn list_active_for_country(&self, country: &str) -> DbResult<Vec<RateEntry>> {
        let sql = format!(
            "{} WHERE country = ?1 AND is_active = 1 \
             ORDER BY priority, min_order_value_cents, rowid",
            SELECT_RATE
        );

        let rates = sqlx::query_as::<_, RateEntry>(&sql)
            .bind(country)
            .fetch_all(&self.pool)
            .await?;

        debug!(country = %country, count = rates.len(), "Loaded active rates");
        Ok(rates)
    }

    /// Lists every rate, active or not, grouped by country.
    pub async fn list_all(&self) -> DbResult<Vec<RateEntry>> {
        let sql = format!(
            "{} ORDER BY country, priority, min_order_value_cents, rowid",
            SELECT_RATE
        );

        let rates = sqlx::query_as::<_, RateEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rates)
    }

    /// Gets a rate by its natural key.
    ///
    /// ## Returns
    /// * `Ok(Some(RateEntry))` - Rate found
    /// * `Ok(None)` - No rate with that name for that country
    pub async fn get_by_natural_key(&self, name: &str, country: &str) -> DbResult<Option<RateEntry>> {
        let sql = format!("{} WHERE name = ?1 AND country = ?2", SELECT_RATE);

        let rate = sqlx::query_as::<_, RateEntry>(&sql)
            .bind(name)
            .bind(country)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rate)
    }

    /// Updates the rate with the same (name, country), or inserts it.
    ///
    /// ## Returns
    /// * `Ok(UpsertOutcome)` - What happened
    /// * `Err(DbError::Core)` - Rate failed validation (e.g. inverted band)
    pub async fn upsert(&self, rate: &RateEntry) -> DbResult<UpsertOutcome> {
        validate_rate_entry(rate)?;

        let mut conn = self.pool.acquire().await?;
        let outcome = upsert_rate(&mut *conn, rate).await?;

        debug!(name = %rate.name, country = %rate.country, ?outcome, "Upserted rate");
        Ok(outcome)
    }

    /// Upserts a batch of rates in one transaction.
    ///
    /// ## All or Nothing
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  1. validate every row (and reject repeated natural keys)           │
    /// │  2. BEGIN                                                           │
    /// │  3. upsert each row                                                 │
    /// │  4. COMMIT  ── any error before this drops the tx → ROLLBACK       │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn bulk_upsert(&self, rates: &[RateEntry]) -> DbResult<UpsertSummary> {
        for rate in rates {
            validate_rate_entry(rate)?;
        }
        ensure_unique_keys(
            "rate",
            rates.iter().map(|r| format!("{} ({})", r.name, r.country)),
        )?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut summary = UpsertSummary::default();
        for rate in rates {
            summary.record(upsert_rate(&mut *tx, rate).await?);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            created = summary.created,
            updated = summary.updated,
            "Bulk upserted shipping rates"
        );
        Ok(summary)
    }

    /// Activates or deactivates a rate.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such rate
    pub async fn set_active(&self, name: &str, country: &str, active: bool) -> DbResult<()> {
        debug!(name = %name, country = %country, active, "Setting rate active flag");

        let result = sqlx::query(
            r#"
            UPDATE shipping_rates
            SET is_active = ?3, updated_at = ?4
            WHERE name = ?1 AND country = ?2
            "#,
        )
        .bind(name)
        .bind(country)
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShippingRate", format!("{} ({})", name, country)));
        }

        Ok(())
    }

    /// Deletes a rate.
    pub async fn delete(&self, name: &str, country: &str) -> DbResult<()> {
        debug!(name = %name, country = %country, "Deleting rate");

        let result = sqlx::query("DELETE FROM shipping_rates WHERE name = ?1 AND country = ?2")
            .bind(name)
            .bind(country)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShippingRate", format!("{} ({})", name, country)));
        }

        Ok(())
    }

    /// Counts all rates.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shipping_rates")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Upsert on an open connection, so it can run inside a transaction.
async fn upsert_rate(conn: &mut SqliteConnection, rate: &RateEntry) -> DbResult<UpsertOutcome> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT id FROM shipping_rates WHERE name = ?1 AND country = ?2")
            .bind(&rate.name)
            .bind(&rate.country)
            .fetch_optional(&mut *conn)
            .await?;

    match existing {
        Some(id) => {
            sqlx::query(
                r#"
                UPDATE shipping_rates SET
                    description = ?2,
                    cost_per_kg_cents = ?3,
                    min_shipping_charge_cents = ?4,
                    min_order_value_cents = ?5,
                    max_order_value_cents = ?6,
                    free_shipping_threshold_cents = ?7,
                    priority = ?8,
                    is_active = ?9,
                    updated_at = ?10
                WHERE id = ?1
                "#,
            )
            .bind(&id)
            .bind(&rate.description)
            .bind(rate.cost_per_kg_cents)
            .bind(rate.min_shipping_charge_cents)
            .bind(rate.min_order_value_cents)
            .bind(rate.max_order_value_cents)
            .bind(rate.free_shipping_threshold_cents)
            .bind(rate.priority)
            .bind(rate.is_active)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

            Ok(UpsertOutcome::Updated)
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO shipping_rates (
                    id, name, description, country,
                    cost_per_kg_cents, min_shipping_charge_cents,
                    min_order_value_cents, max_order_value_cents,
                    free_shipping_threshold_cents, priority, is_active,
                    created_at, updated_at
                ) VALUES (
                    ?1, ?2, ?3, ?4,
                    ?5, ?6,
                    ?7, ?8,
                    ?9, ?10, ?11,
                    ?12, ?13
                )
                "#,
            )
            .bind(&rate.id)
            .bind(&rate.name)
            .bind(&rate.description)
            .bind(&rate.country)
            .bind(rate.cost_per_kg_cents)
            .bind(rate.min_shipping_charge_cents)
            .bind(rate.min_order_value_cents)
            .bind(rate.max_order_value_cents)
            .bind(rate.free_shipping_threshold_cents)
            .bind(rate.priority)
            .bind(rate.is_active)
            .bind(rate.created_at)
            .bind(rate.updated_at)
            .execute(&mut *conn)
            .await?;

            Ok(UpsertOutcome::Created)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shiprate_core::{CoreError, Money, ValidationError};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn germany() -> RateEntry {
        RateEntry::new("Germany Standard", "Germany", Money::from_cents(53500))
            .with_min_charge(Money::from_cents(30000))
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let db = db().await;
        let repo = db.rates();

        let first = germany();
        assert_eq!(repo.upsert(&first).await.unwrap(), UpsertOutcome::Created);

        // New id, same natural key: update in place, original id kept
        let second = germany().with_min_charge(Money::from_cents(35000));
        assert_eq!(repo.upsert(&second).await.unwrap(), UpsertOutcome::Updated);

        let stored = repo
            .get_by_natural_key("Germany Standard", "Germany")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.min_shipping_charge_cents, 35000);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_active_for_country_order() {
        let db = db().await;
        let repo = db.rates();

        repo.bulk_upsert(&[
            RateEntry::new("Economy", "France", Money::from_cents(40000)).with_priority(2),
            RateEntry::new("Bulk", "France", Money::from_cents(50000))
                .with_band(Money::from_cents(100000), None),
            RateEntry::new("Standard", "France", Money::from_cents(56500)),
            RateEntry::new("Old", "France", Money::from_cents(1)).inactive(),
            germany(),
        ])
        .await
        .unwrap();

        let names: Vec<String> = repo
            .list_active_for_country("France")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(names, vec!["Standard", "Bulk", "Economy"]);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_optional_fields() {
        let db = db().await;
        let repo = db.rates();

        let rate = RateEntry::new("Small", "Sweden", Money::from_cents(59400))
            .with_description("Orders under 1000.00")
            .with_band(Money::zero(), Some(Money::from_cents(99999)))
            .with_free_shipping_threshold(Money::from_cents(200000))
            .with_priority(3);
        repo.upsert(&rate).await.unwrap();

        let stored = repo.get_by_natural_key("Small", "Sweden").await.unwrap().unwrap();
        assert_eq!(stored.description.as_deref(), Some("Orders under 1000.00"));
        assert_eq!(stored.max_order_value_cents, Some(99999));
        assert_eq!(stored.free_shipping_threshold_cents, Some(200000));
        assert_eq!(stored.priority, 3);
        assert!(stored.is_active);
    }

    #[tokio::test]
    async fn test_bulk_upsert_counts() {
        let db = db().await;
        let repo = db.rates();

        let summary = repo
            .bulk_upsert(&[germany(), RateEntry::new("UAE Standard", "UAE", Money::from_cents(23000))])
            .await
            .unwrap();
        assert_eq!(summary, UpsertSummary { created: 2, updated: 0 });

        let summary = repo
            .bulk_upsert(&[
                germany(),
                RateEntry::new("Sweden Standard", "Sweden", Money::from_cents(59400)),
            ])
            .await
            .unwrap();
        assert_eq!(summary, UpsertSummary { created: 1, updated: 1 });
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_bulk_upsert_rejects_whole_batch() {
        let db = db().await;
        let repo = db.rates();

        let inverted = RateEntry::new("Bad", "Italy", Money::from_cents(100))
            .with_band(Money::from_cents(5000), Some(Money::from_cents(10)));

        let err = repo.bulk_upsert(&[germany(), inverted]).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InvalidBand { .. })));
        assert_eq!(repo.count().await.unwrap(), 0);

        let err = repo.bulk_upsert(&[germany(), germany()]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Duplicate { .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_active_and_delete() {
        let db = db().await;
        let repo = db.rates();
        repo.upsert(&germany()).await.unwrap();

        repo.set_active("Germany Standard", "Germany", false).await.unwrap();
        assert!(repo.list_active_for_country("Germany").await.unwrap().is_empty());

        repo.set_active("Germany Standard", "Germany", true).await.unwrap();
        assert_eq!(repo.list_active_for_country("Germany").await.unwrap().len(), 1);

        repo.delete("Germany Standard", "Germany").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);

        let err = repo.delete("Germany Standard", "Germany").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        let err = repo.set_active("Nope", "Germany", true).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
