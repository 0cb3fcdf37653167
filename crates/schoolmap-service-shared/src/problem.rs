//! Error responses for the HTTP API.
//!
//! Every failure is rendered as `{"error": "<message>"}` with the status code
//! of its class. Storage and internal failures are logged in full and only a
//! generic message reaches the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use schoolmap_lib::Error as LibError;

/// Message returned for unmatched routes.
pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";

/// Message returned for uncaught failures.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failure of a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input failed validation (400). The message is returned verbatim.
    #[error("{0}")]
    Validation(String),

    /// The store failed while performing `operation` (500).
    #[error("storage failure while {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: LibError,
    },

    /// No route matched (404).
    #[error("Endpoint not found")]
    NotFound,

    /// Anything else that went wrong (500). The detail is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a library error raised while performing `operation`
    /// (e.g. "adding school").
    ///
    /// Coordinate errors are caller mistakes and map to 400; everything else is
    /// a storage failure.
    pub fn from_lib_error(error: LibError, operation: &'static str) -> Self {
        if error.is_storage() {
            Self::Storage {
                operation,
                source: error,
            }
        } else {
            Self::Validation(error.to_string())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(message) => message.clone(),
            ApiError::Storage { operation, .. } => {
                format!("{INTERNAL_MESSAGE} while {operation}")
            }
            ApiError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            ApiError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage { operation, source } => {
                tracing::error!(operation = *operation, error = %source, "storage failure");
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "unhandled error");
            }
            ApiError::Validation(message) => {
                tracing::info!(reason = %message, "request rejected");
            }
            ApiError::NotFound => {}
        }

        (self.status(), Json(self.body())).into_response()
    }
}
