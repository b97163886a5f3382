//! # shiprate-db: Storage and Service Layer for Shiprate
//!
//! This crate stores the shipping reference data in SQLite and serves quotes
//! by loading a snapshot of it for the pure resolver in `shiprate-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shiprate Data Flow                               │
//! │                                                                         │
//! │  quote binary / checkout caller                                        │
//! │       │  ShippingRequest                                                │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    shiprate-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ShippingService│    │  Repositories │    │  Migrations  │  │   │
//! │  │   │ (service.rs)  │───►│ RateRepo      │    │  (embedded)  │  │   │
//! │  │   │               │    │ ZoneRepo      │    │ 001_init.sql │  │   │
//! │  │   │ AppConfig     │    │ PostalCodeRepo│    │              │  │   │
//! │  │   │ (config.rs)   │    └───────┬───────┘    └──────────────┘  │   │
//! │  │   └───────┬───────┘            │ Database (pool.rs)           │   │
//! │  │           │ ReferenceData      │                              │   │
//! │  └───────────┼────────────────────┼──────────────────────────────┘   │
//! │              ▼                    ▼                                     │
//! │     shiprate-core resolver   SQLite (WAL)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and configuration error types
//! - [`repository`] - Rate, zone and postal code repositories
//! - [`config`] - TOML + environment configuration
//! - [`service`] - Per-request snapshot loading and quoting
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shiprate_db::{AppConfig, Database, ShippingService};
//! use shiprate_core::{Money, ShippingRequest, Weight};
//!
//! let config = AppConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//! let service = ShippingService::new(db, config.shipping.clone());
//!
//! let request = ShippingRequest::new(Money::from_cents(30000), "India", Weight::from_grams(2000))
//!     .with_postal_code("110001");
//! let quote = service.quote(&request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, DatabaseSettings};
pub use error::{ConfigError, ConfigResult, DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::ShippingService;

// Repository re-exports for convenience
pub use repository::postal::PostalCodeRepository;
pub use repository::rate::RateRepository;
pub use repository::zone::ZoneRepository;
pub use repository::{UpsertOutcome, UpsertSummary};

/// Initializes the tracing subscriber for the binaries.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shiprate=trace` - Show trace for shiprate crates only
/// - Default: `info,shiprate=debug,sqlx=warn`
///
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shiprate=debug,sqlx=warn"));

    // try_init: a second call is a no-op
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
