//! Prometheus metrics for the schoolmap service.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Install the Prometheus recorder
//! - [`metrics_handler`]: Axum handler for `/metrics`
//! - Business metric helpers for school creation and listing
//!
//! # Example
//!
//! ```no_run
//! use schoolmap_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// `METRICS_ENABLED`: anything but "false" (case-insensitive) enables metrics.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        Self { enabled }
    }
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Install the Prometheus recorder. Call once at startup.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Axum handler for `/metrics`, in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Count a successfully stored school.
pub fn record_school_created() {
    metrics::counter!("schoolmap_schools_created_total").increment(1);
}

/// Count a rejected request.
///
/// * `reason` - "validation_error" or "storage_error"
/// * `endpoint` - "add_school" or "list_schools"
pub fn record_request_rejected(reason: &'static str, endpoint: &'static str) {
    metrics::counter!(
        "schoolmap_requests_rejected_total",
        "reason" => reason,
        "endpoint" => endpoint
    )
    .increment(1);
}

/// Record how many schools one list request returned.
pub fn record_schools_listed(count: usize) {
    metrics::histogram!("schoolmap_schools_listed").record(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        assert!(MetricsConfig::default().enabled);
    }

    #[test]
    fn test_metrics_config_from_lookup() {
        let disabled = MetricsConfig::from_lookup(|_| Some("FALSE".to_string()));
        assert!(!disabled.enabled);

        let enabled = MetricsConfig::from_lookup(|_| Some("yes".to_string()));
        assert!(enabled.enabled);

        let unset = MetricsConfig::from_lookup(|_| None);
        assert!(unset.enabled);
    }

    #[test]
    fn test_disabled_config_is_rejected() {
        let err = init_metrics(&MetricsConfig { enabled: false }).unwrap_err();
        assert!(matches!(err, MetricsError::Disabled));
    }

    #[tokio::test]
    async fn test_metrics_handler_without_recorder() {
        // No test in this crate installs the recorder.
        assert_eq!(metrics_handler().await, "# Metrics not initialized\n");
    }

    #[test]
    fn test_business_metrics_without_recorder() {
        // No recorder installed: the macros must be no-ops, not panics.
        record_school_created();
        record_request_rejected("validation_error", "add_school");
        record_schools_listed(3);
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
