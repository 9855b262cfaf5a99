//! Delivery failure type.

use std::time::Duration;

use thiserror::Error;

/// Any condition that prevents a valid bot reply from being obtained.
///
/// The widget renders every variant the same way. The variants exist so the
/// cause shows up in logs.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Service answered with a non-success status.
    #[error("Service error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// No reply within the request timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Request was cancelled before it settled.
    #[error("Request cancelled")]
    Cancelled,
}

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;
