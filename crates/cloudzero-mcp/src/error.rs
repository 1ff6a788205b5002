//! Error types for the CloudZero client and the tools built on it.

use thiserror::Error;

/// Errors that can occur while talking to the CloudZero API.
#[derive(Error, Debug)]
pub enum CloudZeroError {
    /// Transport-level failure (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a 4xx or 5xx response.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body was not valid JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An operation ran without a client in scope.
    #[error("CloudZero API client not initialized")]
    NotInitialized,

    /// The client was used after its connection was released.
    #[error("CloudZero API client is closed")]
    Closed,

    /// Tool or prompt arguments could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CloudZeroError {
    /// HTTP status code, if this error came from a non-success response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
