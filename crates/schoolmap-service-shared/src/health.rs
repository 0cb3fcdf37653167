//! Health check handlers.
//!
//! - `/health`: the public status document; always 200 while the process runs.
//! - `/health/live`: liveness check, no external dependencies.
//! - `/health/ready`: readiness check, fails with 503 when the store is unreachable.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Always "OK".
    pub status: String,
    pub message: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
}

impl ServiceHealth {
    pub fn now() -> Self {
        Self {
            status: "OK".to_string(),
            message: "School Management API is running".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Status response for liveness and readiness checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Database reachability (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            database: None,
        }
    }

    /// Create a ready status.
    pub fn ready(service: &str, version: &str) -> Self {
        Self {
            database: Some("reachable".to_string()),
            ..Self::alive(service, version)
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            database: Some("unreachable".to_string()),
            ..Self::alive(service, version)
        }
    }
}

/// Public health handler.
///
/// # Example
///
/// ```text
/// GET /health
/// {"status":"OK","message":"School Management API is running","timestamp":"2025-01-01T10:00:00.000Z"}
/// ```
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(ServiceHealth::now()))
}

/// Liveness check handler.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness check handler. Runs a trivial query through the pool.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthStatus::ready(service, version))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            let status = HealthStatus::not_ready(service, version, "database unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolmap_lib::SchoolStore;

    #[test]
    fn test_service_health_now() {
        let health = ServiceHealth::now();
        assert_eq!(health.status, "OK");
        assert!(health.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
    }

    #[test]
    fn test_health_status_alive() {
        let status = HealthStatus::alive("test-service", "1.0.0");
        assert_eq!(status.status, "ok");
        assert_eq!(status.service, "test-service");
        assert!(status.database.is_none());

        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("database"));
    }

    #[test]
    fn test_health_status_not_ready() {
        let status = HealthStatus::not_ready("test-service", "1.0.0", "no db");
        assert!(status.status.starts_with("not_ready:"));
        assert_eq!(status.database.as_deref(), Some("unreachable"));
    }

    #[tokio::test]
    async fn test_ready_with_open_store() {
        let state = AppState::new(SchoolStore::open_in_memory().unwrap());
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_when_database_unreachable() {
        let state = crate::test_utils::unreachable_state();
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
