//! Error types for the trends client adapter.

use thiserror::Error;

/// Errors that can occur while querying the Trends API.
#[derive(Debug, Error)]
pub enum TrendsError {
    /// A caller-supplied argument was rejected before any request was sent.
    #[error("Invalid argument {field}='{value}': {reason}")]
    InvalidArgument {
        /// Name of the offending parameter
        field: &'static str,
        /// The rejected value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Network communication error occurred while calling the API.
    #[error("Network error: {reason}")]
    NetworkError {
        /// The reason for the network error
        reason: String,
    },

    /// The API answered with a non-success status.
    #[error("Trends API returned HTTP {status}: {body}")]
    UpstreamError {
        /// HTTP status code returned by the API
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// Failed to decode the API response.
    #[error("Parse error: {reason}")]
    ParseError {
        /// The reason for the parse error
        reason: String,
    },

    /// The discovery document could not be fetched or did not describe the
    /// requested operation.
    #[error("Discovery error: {reason}")]
    DiscoveryError {
        /// The reason for the discovery failure
        reason: String,
    },
}

impl TrendsError {
    /// Checks if this error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TrendsError::InvalidArgument { .. })
    }
}
