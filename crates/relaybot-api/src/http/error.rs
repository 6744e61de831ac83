//! Application error type mapping to HTTP status codes.
//!
//! The webhook caller only looks at the status, so bodies stay minimal and
//! never carry internal details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use relaybot_core::relay::service::RelayError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Signature missing, malformed, or wrong.
    Unauthorized(String),
    /// The request body could not be read.
    BadRequest(String),
    /// The body is not a webhook batch, or at least one event failed.
    Internal(String),
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "INVALID_SIGNATURE",
            AppError::BadRequest(_) => "UNREADABLE_BODY",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) => {
                tracing::warn!(status = status.as_u16(), reason = %msg, "webhook rejected");
            }
            AppError::Internal(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "webhook batch failed");
            }
        }

        let body = json!({ "error": { "code": self.code() } });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
