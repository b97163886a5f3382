//! # Database Migrations
//!
//! Embedded SQL migrations for the shipping reference data.
//!
//! `001_initial_schema.sql` creates the zone, postal code and rate tables
//! with their CHECK constraints. Later changes go in new numbered files;
//! applied files are checksummed and must not be edited.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// `migrations/sqlite`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations in filename order, each in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
