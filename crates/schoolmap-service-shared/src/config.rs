//! Service configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `3000` |
//! | `DB_PATH` | `<DB_NAME>.db` |
//! | `DB_NAME` | `school_management` |
//! | `DB_POOL_SIZE` | `10` |
//! | `DB_BUSY_TIMEOUT_MS` | `5000` |
//!
//! Logging and metrics read their own variables; see
//! [`LoggingConfig`](crate::LoggingConfig) and [`MetricsConfig`](crate::MetricsConfig).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use schoolmap_lib::db::{DEFAULT_BUSY_TIMEOUT, DEFAULT_POOL_SIZE};
use schoolmap_lib::StoreConfig;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default database name; the file is `<name>.db`.
pub const DEFAULT_DB_NAME: &str = "school_management";

/// A variable was set to something that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub store: StoreConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store: StoreConfig::default().with_path(format!("{DEFAULT_DB_NAME}.db")),
        }
    }
}

impl ServiceConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;

        let path = match (get("DB_PATH"), get("DB_NAME")) {
            (Some(path), _) => PathBuf::from(path),
            (None, Some(name)) => PathBuf::from(format!("{}.db", name.trim())),
            (None, None) => PathBuf::from(format!("{DEFAULT_DB_NAME}.db")),
        };

        let pool_size: usize = parse_or(get("DB_POOL_SIZE"), "DB_POOL_SIZE", DEFAULT_POOL_SIZE)?;
        if pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_POOL_SIZE",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let busy_timeout = match get("DB_BUSY_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(parse_value(&raw, "DB_BUSY_TIMEOUT_MS")?),
            None => DEFAULT_BUSY_TIMEOUT,
        };

        Ok(Self {
            port,
            store: StoreConfig {
                path,
                pool_size,
                busy_timeout,
            },
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse_value(&raw, key),
        None => Ok(default),
    }
}

fn parse_value<T>(raw: &str, key: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: err.to_string(),
        })
}
