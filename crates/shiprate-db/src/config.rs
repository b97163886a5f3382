//! # Configuration
//!
//! Where the database lives and how the fallback chain is tuned.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHIPRATE_DB_PATH=/var/lib/shiprate/shiprate.db                     │
//! │     SHIPRATE_HOME_COUNTRY=India                                        │
//! │     SHIPRATE_DEFAULT_RATE_PER_KG_CENTS=5000                            │
//! │     SHIPRATE_DEFAULT_MIN_CHARGE_CENTS=10000                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or the platform config dir:                       │
//! │     ~/.config/shiprate/config.toml (Linux)                             │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     India, 50.00/kg, 100.00 minimum                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "./shiprate.db"
//! max_connections = 5
//!
//! [shipping]
//! home_country = "India"
//! default_rate_per_kg_cents = 5000
//! default_min_charge_cents = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::pool::DbConfig;
use shiprate_core::validation::validate_amount_cents;
use shiprate_core::ResolverSettings;

// =============================================================================
// Database Settings
// =============================================================================

/// Where the SQLite file lives and how many connections to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "shiprate", "shiprate")
        .map(|dirs| dirs.data_dir().join("shiprate.db"))
        .unwrap_or_else(|| PathBuf::from("./shiprate.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete configuration for the service and binaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Fallback chain settings.
    #[serde(default)]
    pub shipping: ResolverSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform config dir)
    /// 3. Environment variables
    ///
    /// A missing file is fine. An explicit path that doesn't exist is not.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else if explicit {
                return Err(ConfigError::Invalid(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections and fields take defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.shipping.home_country.trim().is_empty() {
            return Err(ConfigError::Invalid("home_country must not be empty".into()));
        }

        validate_amount_cents(
            "default_rate_per_kg_cents",
            self.shipping.default_rate_per_kg_cents,
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        validate_amount_cents(
            "default_min_charge_cents",
            self.shipping.default_min_charge_cents,
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Builds the pool configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any variable source.
    ///
    /// Unparseable numbers are logged and ignored.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("SHIPRATE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(country) = var("SHIPRATE_HOME_COUNTRY") {
            debug!(home_country = %country, "Overriding home country from environment");
            self.shipping.home_country = country;
        }

        if let Some(rate) = var("SHIPRATE_DEFAULT_RATE_PER_KG_CENTS") {
            match rate.parse::<i64>() {
                Ok(cents) => self.shipping.default_rate_per_kg_cents = cents,
                Err(_) => warn!(value = %rate, "Ignoring invalid SHIPRATE_DEFAULT_RATE_PER_KG_CENTS"),
            }
        }

        if let Some(min) = var("SHIPRATE_DEFAULT_MIN_CHARGE_CENTS") {
            match min.parse::<i64>() {
                Ok(cents) => self.shipping.default_min_charge_cents = cents,
                Err(_) => warn!(value = %min, "Ignoring invalid SHIPRATE_DEFAULT_MIN_CHARGE_CENTS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shiprate", "shiprate")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.shipping.home_country, "India");
        assert_eq!(config.shipping.default_rate_per_kg_cents, 5000);
        assert_eq!(config.shipping.default_min_charge_cents, 10000);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [shipping]
            home_country = "Sri Lanka"
            "#,
        )
        .unwrap();

        assert_eq!(config.shipping.home_country, "Sri Lanka");
        assert_eq!(config.shipping.default_min_charge_cents, 10000);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_full_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            path = "/tmp/rates.db"
            max_connections = 2

            [shipping]
            home_country = "India"
            default_rate_per_kg_cents = 6000
            default_min_charge_cents = 12000
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/tmp/rates.db"));
        assert_eq!(config.db_config().max_connections, 2);
        assert_eq!(config.shipping.default_rate_per_kg_cents, 6000);
    }

    #[test]
    fn test_bad_toml() {
        let err = AppConfig::from_toml_str("[shipping]\nhome_country = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SHIPRATE_DB_PATH", "/data/shiprate.db"),
            ("SHIPRATE_HOME_COUNTRY", "Nepal"),
            ("SHIPRATE_DEFAULT_RATE_PER_KG_CENTS", "7500"),
            ("SHIPRATE_DEFAULT_MIN_CHARGE_CENTS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, PathBuf::from("/data/shiprate.db"));
        assert_eq!(config.shipping.home_country, "Nepal");
        assert_eq!(config.shipping.default_rate_per_kg_cents, 7500);
        // Invalid value ignored
        assert_eq!(config.shipping.default_min_charge_cents, 10000);
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();

        config.shipping.home_country = "  ".into();
        assert!(config.validate().is_err());

        config.shipping.home_country = "India".into();
        config.shipping.default_rate_per_kg_cents = -1;
        assert!(config.validate().is_err());

        config.shipping.default_rate_per_kg_cents = 0;
        config.shipping.default_min_charge_cents = -1;
        assert!(config.validate().is_err());

        config.shipping.default_min_charge_cents = shiprate_core::MAX_AMOUNT_CENTS + 1;
        assert!(config.validate().is_err());

        config.shipping.default_min_charge_cents = 0;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = AppConfig::load(Some(PathBuf::from("/nonexistent/shiprate/config.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[shipping]"));
    }
}
