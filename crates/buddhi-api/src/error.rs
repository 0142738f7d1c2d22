//! API error types and JSON error response formatting.
//!
//! ApiError maps request and dispatch failures to HTTP status codes with a
//! consistent JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 Bad Request - missing fields, unreadable bodies, failed rules.
    #[error("{0}")]
    BadRequest(String),
    /// 413 Payload Too Large - upload exceeds the configured limit.
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl ApiError {
    /// Build an error from an extractor rejection, keeping its size-limit status.
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message)
        } else {
            ApiError::BadRequest(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg),
            ApiError::PayloadTooLarge(msg) => ("payload_too_large", msg),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
