//! HTTP middleware for the schoolmap service.
//!
//! This module provides:
//! - [`RequestId`]: Newtype for correlation IDs
//! - [`extract_or_generate_request_id`]: Read `X-Request-ID` or generate a UUID v7
//! - [`track_requests`]: `axum::middleware::from_fn` handler that opens a
//!   request span, records HTTP metrics, and echoes the request ID
//!
//! # Metrics Recording
//!
//! - `http_requests_total`: Counter by method, route, status bucket
//! - `http_request_duration_seconds`: Histogram by method, route
//!
//! Routes are labelled by their matched pattern; anything that hit the
//! fallback is labelled `unmatched` so random paths cannot blow up label
//! cardinality.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// Header carrying the correlation ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Use the caller's `X-Request-ID` when it is non-empty visible ASCII,
/// otherwise generate a UUID v7.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Request tracking middleware.
///
/// ```ignore
/// let app = Router::new()
///     .route("/health", get(health))
///     .layer(axum::middleware::from_fn(track_requests));
/// ```
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let request_id = extract_or_generate_request_id(request.headers());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
    );

    async move {
        tracing::info!("handling request");

        let mut response = next.run(request).await;

        let status = response.status().as_u16();
        let elapsed = start.elapsed();

        metrics::counter!(
            "http_requests_total",
            "method" => method.clone(),
            "route" => route.clone(),
            "status" => status_bucket(status)
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => method,
            "route" => route
        )
        .record(elapsed.as_secs_f64());

        if status >= 500 {
            tracing::error!(status, latency_ms = elapsed.as_secs_f64() * 1000.0, "request failed");
        } else {
            tracing::info!(status, latency_ms = elapsed.as_secs_f64() * 1000.0, "request completed");
        }

        if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
