//! API error types and response formatting.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use trendscope_trends::TrendsError;

/// API error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body missing, malformed, or carrying invalid values.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Failure reported by the trends adapter.
    #[error("trends error: {0}")]
    Trends(#[from] TrendsError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Errors that stop the server from starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding or serving the listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The trends adapter could not be constructed.
    #[error("Trends setup failed: {0}")]
    Trends(#[from] TrendsError),
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone())),
            Self::Trends(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(err.to_string()))
            }
            Self::Trends(err) => {
                tracing::error!(error = %err, "trends request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    Some("The trends service request failed".to_string()),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
