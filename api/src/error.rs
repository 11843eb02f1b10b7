//! Error types for the todolist API client

use thiserror::Error;

/// Errors that can occur when interacting with the todolist API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    Request(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    Parse(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - missing or invalid API key
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// API answered with a non-success HTTP status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// API answered 200 but refused the operation (`resultCode != 0`)
    #[error("API rejected the request: {}", messages.join("; "))]
    Rejected {
        /// Messages from the response envelope
        messages: Vec<String>,
    },
}

/// A wire integer that does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value {value}")]
pub struct UnknownVariant {
    /// Which enum was being decoded
    pub kind: &'static str,
    /// The offending value
    pub value: u8,
}
