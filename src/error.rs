//! Error types for the KF6 client

use thiserror::Error;

/// KF6 client error
#[derive(Debug, Error)]
pub enum Error {
    /// Credential exchange did not succeed
    #[error("Authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    /// Authenticated request returned a non-success status
    #[error("Request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// Operation called in a state or with arguments it does not accept
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Rise-above chain leads back to a view that is still being expanded
    #[error("Rise-above cycle detected at view {view_id}")]
    Cycle { view_id: String },

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON record did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body is structurally unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration cannot be used to open a session
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for KF6 client operations
pub type Result<T> = std::result::Result<T, Error>;
