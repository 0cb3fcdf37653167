//! Shared infrastructure for the schoolmap HTTP service.
//!
//! This crate provides the HTTP glue around `schoolmap-lib`:
//!
//! - [`AppState`]: The injected [`SchoolStore`](schoolmap_lib::SchoolStore) handle
//! - [`ServiceConfig`]: Environment-driven configuration
//! - Request types with validation for each endpoint ([`Validate`])
//! - [`ApiError`]: `{"error": ...}` responses for validation, storage, and routing failures
//! - [`ServiceResponse`]: Wrapper for successful responses with a status and message
//! - [`health`]: Health check handlers
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//!
//! # Architecture
//!
//! Handlers stay thin; the domain rules live in `schoolmap-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Extract JSON body / query string                         │
//! │  - Validate into typed values                               │
//! │  - Call SchoolStore / rank_by_distance                      │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides ready-made state for handler tests.
//! Enable the `test-utils` feature to access it from dependent crates.

pub mod config;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConfigError, ServiceConfig};
pub use health::{health, health_live, health_ready, HealthStatus, ServiceHealth};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_request_rejected, record_school_created,
    record_schools_listed, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, track_requests, RequestId, REQUEST_ID_HEADER};
pub use problem::{ApiError, ErrorBody};
pub use request::{AddSchoolForm, AddSchoolRequest, LocationQuery, Validate};
pub use response::{AddSchoolResponse, ListSchoolsResponse, ServiceResponse};
pub use state::AppState;
