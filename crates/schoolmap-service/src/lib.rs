//! School proximity HTTP service.
//!
//! # Endpoints
//!
//! - `POST /addSchool` - Store a school
//! - `GET /listSchools?latitude=..&longitude=..` - All schools, nearest first
//! - `GET /health` - Service status document
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check (pings the database)
//! - `GET /metrics` - Prometheus metrics endpoint
//!
//! Anything else answers 404 `{"error":"Endpoint not found"}`.

pub mod handlers;

use std::any::Any;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use schoolmap_service_shared::{
    health, health_live, health_ready, metrics_handler, track_requests, ApiError, AppState,
};

use crate::handlers::{add_school, list_schools, not_found};

/// Paths served by [`router`], logged at startup.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("POST", "/addSchool"),
    ("GET", "/listSchools"),
    ("GET", "/health"),
    ("GET", "/health/live"),
    ("GET", "/health/ready"),
    ("GET", "/metrics"),
];

/// Build the application router.
pub fn router(state: AppState) -> Router {
    // Per-route fallbacks turn an unsupported method into the same 404 as an
    // unknown path.
    let routes = Router::new()
        .route("/addSchool", post(add_school).fallback(not_found))
        .route("/listSchools", get(list_schools).fallback(not_found))
        .route("/health", get(health).fallback(not_found))
        .route("/health/live", get(health_live).fallback(not_found))
        .route("/health/ready", get(health_ready).fallback(not_found))
        .route("/metrics", get(metrics_handler).fallback(not_found))
        .fallback(not_found);

    with_layers(routes).with_state(state)
}

/// Wrap `router` in the service middleware stack.
///
/// Panics inside handlers become a 500 `{"error":"Internal server error"}`,
/// and every response carries an `x-request-id` header.
pub fn with_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(track_requests))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_handle_panic_hides_payload() {
        let response = handle_panic(Box::new("secret detail".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_endpoints_listed() {
        assert!(ENDPOINTS.contains(&("POST", "/addSchool")));
        assert!(ENDPOINTS.contains(&("GET", "/listSchools")));
        assert_eq!(ENDPOINTS.len(), 6);
    }
}
