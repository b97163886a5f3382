//! # Zone Repository
//!
//! Database operations for domestic shipping zones.
//!
//! Zones are keyed by their code (`north`, `south`, ...). Postal codes
//! reference that code, and deleting a zone deletes its postal codes.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{ensure_unique_keys, UpsertOutcome, UpsertSummary};
use shiprate_core::validation::validate_zone_entry;
use shiprate_core::ZoneEntry;

const SELECT_ZONE: &str = r#"
    SELECT
        id,
        zone,
        description,
        cost_per_kg_cents,
        free_shipping_threshold_cents,
        delivery_days,
        is_active,
        created_at,
        updated_at
    FROM shipping_zones
"#;

/// Repository for shipping zone database operations.
#[derive(Debug, Clone)]
pub struct ZoneRepository {
    pool: SqlitePool,
}

impl ZoneRepository {
    /// Creates a new ZoneRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ZoneRepository { pool }
    }

    /// Gets a zone by code, active or not.
    ///
    /// The resolver decides what an inactive zone means.
    pub async fn get_by_code(&self, zone: &str) -> DbResult<Option<ZoneEntry>> {
        let sql = format!("{} WHERE zone = ?1", SELECT_ZONE);

        let entry = sqlx::query_as::<_, ZoneEntry>(&sql)
            .bind(zone)
            .fetch_optional(&self.pool)
            .await?;

        debug!(zone = %zone, found = entry.is_some(), "Zone lookup");
        Ok(entry)
    }

    /// Lists all zones ordered by code.
    pub async fn list_all(&self) -> DbResult<Vec<ZoneEntry>> {
        let sql = format!("{} ORDER BY zone", SELECT_ZONE);

        let zones = sqlx::query_as::<_, ZoneEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(zones)
    }

    /// Updates the zone with the same code, or inserts it.
    pub async fn upsert(&self, zone: &ZoneEntry) -> DbResult<UpsertOutcome> {
        validate_zone_entry(zone)?;

        let mut conn = self.pool.acquire().await?;
        let outcome = upsert_zone(&mut *conn, zone).await?;

        debug!(zone = %zone.zone, ?outcome, "Upserted zone");
        Ok(outcome)
    }

    /// Upserts a batch of zones in one transaction.
    pub async fn bulk_upsert(&self, zones: &[ZoneEntry]) -> DbResult<UpsertSummary> {
        for zone in zones {
            validate_zone_entry(zone)?;
        }
        ensure_unique_keys("zone", zones.iter().map(|z| z.zone.as_str()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut summary = UpsertSummary::default();
        for zone in zones {
            summary.record(upsert_zone(&mut *tx, zone).await?);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            created = summary.created,
            updated = summary.updated,
            "Bulk upserted shipping zones"
        );
        Ok(summary)
    }

    /// Activates or deactivates a zone.
    pub async fn set_active(&self, zone: &str, active: bool) -> DbResult<()> {
        debug!(zone = %zone, active, "Setting zone active flag");

        let result = sqlx::query(
            "UPDATE shipping_zones SET is_active = ?2, updated_at = ?3 WHERE zone = ?1",
        )
        .bind(zone)
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShippingZone", zone));
        }

        Ok(())
    }

    /// Deletes a zone and, through the foreign key, its postal codes.
    pub async fn delete(&self, zone: &str) -> DbResult<()> {
        debug!(zone = %zone, "Deleting zone");

        let result = sqlx::query("DELETE FROM shipping_zones WHERE zone = ?1")
            .bind(zone)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShippingZone", zone));
        }

        Ok(())
    }

    /// Counts all zones.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shipping_zones")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn upsert_zone(conn: &mut SqliteConnection, zone: &ZoneEntry) -> DbResult<UpsertOutcome> {
    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM shipping_zones WHERE zone = ?1")
        .bind(&zone.zone)
        .fetch_optional(&mut *conn)
        .await?;

    match existing {
        Some(id) => {
            sqlx::query(
                r#"
                UPDATE shipping_zones SET
                    description = ?2,
                    cost_per_kg_cents = ?3,
                    free_shipping_threshold_cents = ?4,
                    delivery_days = ?5,
                    is_active = ?6,
                    updated_at = ?7
                WHERE id = ?1
                "#,
            )
            .bind(&id)
            .bind(&zone.description)
            .bind(zone.cost_per_kg_cents)
            .bind(zone.free_shipping_threshold_cents)
            .bind(&zone.delivery_days)
            .bind(zone.is_active)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

            Ok(UpsertOutcome::Updated)
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO shipping_zones (
                    id, zone, description,
                    cost_per_kg_cents, free_shipping_threshold_cents,
                    delivery_days, is_active, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&zone.id)
            .bind(&zone.zone)
            .bind(&zone.description)
            .bind(zone.cost_per_kg_cents)
            .bind(zone.free_shipping_threshold_cents)
            .bind(&zone.delivery_days)
            .bind(zone.is_active)
            .bind(zone.created_at)
            .bind(zone.updated_at)
            .execute(&mut *conn)
            .await?;

            Ok(UpsertOutcome::Created)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shiprate_core::{Money, PostalRecord};

    fn north() -> ZoneEntry {
        ZoneEntry::new("north", Money::from_cents(4000), Money::from_cents(50000))
            .with_description("Delhi, Punjab, Haryana")
            .with_delivery_days("3-5 business days")
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.zones();

        assert_eq!(repo.upsert(&north()).await.unwrap(), UpsertOutcome::Created);

        let stored = repo.get_by_code("north").await.unwrap().unwrap();
        assert_eq!(stored.cost_per_kg_cents, 4000);
        assert_eq!(stored.delivery_days.as_deref(), Some("3-5 business days"));

        let cheaper = ZoneEntry::new("north", Money::from_cents(3500), Money::from_cents(50000));
        assert_eq!(repo.upsert(&cheaper).await.unwrap(), UpsertOutcome::Updated);

        let stored = repo.get_by_code("north").await.unwrap().unwrap();
        assert_eq!(stored.cost_per_kg_cents, 3500);
        assert_eq!(stored.delivery_days, None);
        assert!(repo.get_by_code("west").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bulk_upsert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.zones();

        let summary = repo
            .bulk_upsert(&[
                north(),
                ZoneEntry::new("south", Money::from_cents(5000), Money::from_cents(50000)),
            ])
            .await
            .unwrap();
        assert_eq!(summary, UpsertSummary { created: 2, updated: 0 });

        let codes: Vec<String> = repo.list_all().await.unwrap().into_iter().map(|z| z.zone).collect();
        assert_eq!(codes, vec!["north", "south"]);

        let err = repo.bulk_upsert(&[north(), north()]).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_set_active_keeps_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.zones();
        repo.upsert(&north()).await.unwrap();

        repo.set_active("north", false).await.unwrap();
        let stored = repo.get_by_code("north").await.unwrap().unwrap();
        assert!(!stored.is_active);

        assert!(matches!(
            repo.set_active("west", true).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_postal_codes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.zones().upsert(&north()).await.unwrap();
        db.postal_codes()
            .upsert(&PostalRecord::new("110001", "India").with_zone("north"))
            .await
            .unwrap();
        db.postal_codes()
            .upsert(&PostalRecord::new("10115", "Germany"))
            .await
            .unwrap();

        db.zones().delete("north").await.unwrap();

        assert_eq!(db.zones().count().await.unwrap(), 0);
        assert!(db.postal_codes().get_by_code("110001").await.unwrap().is_none());
        assert!(db.postal_codes().get_by_code("10115").await.unwrap().is_some());
    }
}
