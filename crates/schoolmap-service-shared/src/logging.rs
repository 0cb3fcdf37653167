//! Structured logging setup.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` (default) or `text` / `pretty`
//! - `RUST_LOG`: log filter (default: `info`)
//! - `SERVICE_NAME`: service name attached to the startup span (default: `schoolmap`)
//!
//! # Example
//!
//! ```no_run
//! use schoolmap_service_shared::logging::{LoggingConfig, init_logging};
//!
//! let config = LoggingConfig::from_env();
//! init_logging(&config).expect("logging initialised once");
//! ```

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default service name used in log output.
pub const DEFAULT_SERVICE_NAME: &str = "schoolmap";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logging (default, production).
    #[default]
    Json,
    /// Human-readable text logging (development).
    Text,
}

impl FromStr for LogFormat {
    type Err = Infallible;

    /// `text` and `pretty` select [`LogFormat::Text`]; anything else is JSON.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        })
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info").
    pub level: String,
    pub service: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            service: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl LoggingConfig {
    /// Read `LOG_FORMAT`, `RUST_LOG`, and `SERVICE_NAME` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`LoggingConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            format: lookup("LOG_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.format),
            level: lookup("RUST_LOG").unwrap_or(defaults.level),
            service: lookup("SERVICE_NAME").unwrap_or(defaults.service),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed, so tests and embedders can
/// ignore the error instead of panicking.
///
/// # JSON Format (default)
///
/// ```json
/// {"timestamp":"2025-01-01T10:00:00Z","level":"INFO","fields":{"message":"school created","school_id":4},"target":"schoolmap_service::handlers"}
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?,
    }

    tracing::info!(service = %config.service, format = ?config.format, "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!(" pretty ".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("unknown".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
        assert_eq!(config.service, "schoolmap");
    }

    #[test]
    fn test_logging_config_from_lookup() {
        let vars: HashMap<&str, &str> =
            [("LOG_FORMAT", "text"), ("RUST_LOG", "debug"), ("SERVICE_NAME", "schools-eu")]
                .into_iter()
                .collect();
        let config = LoggingConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.level, "debug");
        assert_eq!(config.service, "schools-eu");
    }
}
