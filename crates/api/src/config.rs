//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use catalog::CatalogConfig;
use domain::DEFAULT_STORAGE_KEY;
use thiserror::Error;

/// Errors raised for invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    /// A variable required by the selected options is not set.
    #[error("Missing required variable {0}")]
    Missing(&'static str),
}

/// Where the cart blob is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; lost on restart.
    Memory,
    /// A JSON file on local disk.
    File { path: PathBuf },
    /// A PostgreSQL table.
    Postgres { url: String },
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` (default: `"0.0.0.0"`)
/// - `PORT` (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `CATALOG_URL` (default: `"http://localhost:3333"`)
/// - `CATALOG_TIMEOUT_SECS` (default: `10`)
/// - `CART_STORAGE`: `memory`, `file` or `postgres` (default: `memory`)
/// - `CART_STORAGE_PATH`: file backend path (default: `"cart-storage.json"`)
/// - `DATABASE_URL`: required by the postgres backend
/// - `CART_STORAGE_KEY` (default: `"@RocketShoes:cart"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub catalog: CatalogConfig,
    pub storage: StorageBackend,
    pub storage_key: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => parse_var("PORT", raw)?,
            None => defaults.port,
        };
        let timeout_secs = match lookup("CATALOG_TIMEOUT_SECS") {
            Some(raw) => parse_var("CATALOG_TIMEOUT_SECS", raw)?,
            None => defaults.catalog.timeout_secs,
        };

        let storage = match lookup("CART_STORAGE").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StorageBackend::Memory,
            Some("file") => StorageBackend::File {
                path: lookup("CART_STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("cart-storage.json")),
            },
            Some("postgres") => StorageBackend::Postgres {
                url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "CART_STORAGE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            catalog: CatalogConfig {
                base_url: lookup("CATALOG_URL").unwrap_or(defaults.catalog.base_url),
                timeout_secs,
            },
            storage,
            storage_key: lookup("CART_STORAGE_KEY").unwrap_or(defaults.storage_key),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value: raw })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            catalog: CatalogConfig::default(),
            storage: StorageBackend::Memory,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}
