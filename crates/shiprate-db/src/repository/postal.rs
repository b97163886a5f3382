//! # Postal Code Repository
//!
//! Database operations for the postal code lookup table.
//!
//! Codes are stored and matched exactly as given: no trimming, no case
//! folding. A code with a zone must reference an existing zone (foreign key).

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{ensure_unique_keys, UpsertOutcome, UpsertSummary};
use shiprate_core::validation::validate_postal_record;
use shiprate_core::PostalRecord;

const SELECT_POSTAL: &str = r#"
    SELECT
        id,
        postal_code,
        zone,
        country,
        city,
        state,
        created_at,
        updated_at
    FROM postal_codes
"#;

/// Repository for postal code database operations.
#[derive(Debug, Clone)]
pub struct PostalCodeRepository {
    pool: SqlitePool,
}

impl PostalCodeRepository {
    /// Creates a new PostalCodeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PostalCodeRepository { pool }
    }

    /// Gets a postal record by exact code.
    ///
    /// ## Returns
    /// * `Ok(Some(PostalRecord))` - Code known
    /// * `Ok(None)` - Unknown code (not an error for the resolver)
    pub async fn get_by_code(&self, postal_code: &str) -> DbResult<Option<PostalRecord>> {
        let sql = format!("{} WHERE postal_code = ?1", SELECT_POSTAL);

        let record = sqlx::query_as::<_, PostalRecord>(&sql)
            .bind(postal_code)
            .fetch_optional(&self.pool)
            .await?;

        debug!(postal_code = %postal_code, found = record.is_some(), "Postal code lookup");
        Ok(record)
    }

    /// Lists the postal codes of one country.
    pub async fn list_by_country(&self, country: &str) -> DbResult<Vec<PostalRecord>> {
        let sql = format!("{} WHERE country = ?1 ORDER BY postal_code", SELECT_POSTAL);

        let records = sqlx::query_as::<_, PostalRecord>(&sql)
            .bind(country)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Updates the record with the same code, or inserts it.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Zone doesn't exist
    pub async fn upsert(&self, record: &PostalRecord) -> DbResult<UpsertOutcome> {
        validate_postal_record(record)?;

        let mut conn = self.pool.acquire().await?;
        let outcome = upsert_postal(&mut *conn, record).await?;

        debug!(postal_code = %record.postal_code, ?outcome, "Upserted postal code");
        Ok(outcome)
    }

    /// Upserts a batch of postal records in one transaction.
    pub async fn bulk_upsert(&self, records: &[PostalRecord]) -> DbResult<UpsertSummary> {
        for record in records {
            validate_postal_record(record)?;
        }
        ensure_unique_keys("postal_code", records.iter().map(|r| r.postal_code.as_str()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut summary = UpsertSummary::default();
        for record in records {
            summary.record(upsert_postal(&mut *tx, record).await?);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            created = summary.created,
            updated = summary.updated,
            "Bulk upserted postal codes"
        );
        Ok(summary)
    }

    /// Deletes a postal record.
    pub async fn delete(&self, postal_code: &str) -> DbResult<()> {
        debug!(postal_code = %postal_code, "Deleting postal code");

        let result = sqlx::query("DELETE FROM postal_codes WHERE postal_code = ?1")
            .bind(postal_code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PostalCode", postal_code));
        }

        Ok(())
    }

    /// Counts all postal records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM postal_codes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn upsert_postal(conn: &mut SqliteConnection, record: &PostalRecord) -> DbResult<UpsertOutcome> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT id FROM postal_codes WHERE postal_code = ?1")
            .bind(&record.postal_code)
            .fetch_optional(&mut *conn)
            .await?;

    match existing {
        Some(id) => {
            sqlx::query(
                r#"
                UPDATE postal_codes SET
                    zone = ?2,
                    country = ?3,
                    city = ?4,
                    state = ?5,
                    updated_at = ?6
                WHERE id = ?1
                "#,
            )
            .bind(&id)
            .bind(&record.zone)
            .bind(&record.country)
            .bind(&record.city)
            .bind(&record.state)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

            Ok(UpsertOutcome::Updated)
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO postal_codes (
                    id, postal_code, zone, country, city, state,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&record.id)
            .bind(&record.postal_code)
            .bind(&record.zone)
            .bind(&record.country)
            .bind(&record.city)
            .bind(&record.state)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *conn)
            .await?;

            Ok(UpsertOutcome::Created)
        }
    }
}
