//! Typed error handling for sort preferences
//!
//! Every failure the subsystem can observe is represented by [`PreferenceError`].
//! The controller recovers from all of them locally (see
//! [`SortingController`](crate::sorting::SortingController)); the typed error is
//! still exposed so storage backends, the HTTP client and the preference
//! server can report precisely what went wrong.
//!
//! # Example
//!
//! ```rust,ignore
//! use sort_preferences::prelude::*;
//!
//! match remote.fetch("companies").await {
//!     Ok(Some(config)) => println!("remote: {}", config),
//!     Ok(None) => println!("no stored preference"),
//!     Err(PreferenceError::Status { status: 503, .. }) => println!("backend down"),
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The main error type for the sort preference subsystem
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// A cached or received payload could not be (de)serialized
    #[error("Failed to serialize/deserialize sort preference: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A sort configuration violates its invariants (e.g. empty field)
    #[error("Invalid sort configuration: {0}")]
    InvalidConfig(String),

    /// A table identifier is not acceptable as a storage key
    #[error("Invalid table name: '{0}'")]
    InvalidTableName(String),

    /// A local storage backend failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem error from a file-backed tier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure talking to the remote tier
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote tier answered with a non-success status
    #[error("Remote tier returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The owning scope was torn down before the operation completed
    #[error("Operation cancelled")]
    Cancelled,

    /// Background work was requested outside of a tokio runtime
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl PreferenceError {
    /// HTTP status code this error maps to when served
    pub fn status_code(&self) -> u16 {
        match self {
            PreferenceError::Serialization(_) => 400,
            PreferenceError::InvalidConfig(_) => 400,
            PreferenceError::InvalidTableName(_) => 400,
            PreferenceError::Storage(_) => 500,
            PreferenceError::Io(_) => 500,
            #[cfg(feature = "http")]
            PreferenceError::Http(_) => 502,
            PreferenceError::Status { .. } => 502,
            PreferenceError::Cancelled => 503,
            PreferenceError::NoRuntime(_) => 500,
        }
    }

    /// Stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PreferenceError::Serialization(_) => "SERIALIZATION_ERROR",
            PreferenceError::InvalidConfig(_) => "INVALID_SORT_CONFIG",
            PreferenceError::InvalidTableName(_) => "INVALID_TABLE_NAME",
            PreferenceError::Storage(_) => "STORAGE_ERROR",
            PreferenceError::Io(_) => "IO_ERROR",
            #[cfg(feature = "http")]
            PreferenceError::Http(_) => "HTTP_ERROR",
            PreferenceError::Status { .. } => "REMOTE_STATUS_ERROR",
            PreferenceError::Cancelled => "CANCELLED",
            PreferenceError::NoRuntime(_) => "NO_RUNTIME",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }

    /// Shorthand for storage backend failures
    pub fn storage(message: impl std::fmt::Display) -> Self {
        PreferenceError::Storage(message.to_string())
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for PreferenceError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), "{}", self);
        }
        (status, axum::Json(self.to_response())).into_response()
    }
}

/// Result type alias for sort preference operations
pub type PreferenceResult<T> = std::result::Result<T, PreferenceError>;
