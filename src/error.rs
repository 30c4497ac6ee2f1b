//! Huginn error types

use std::time::Duration;

/// Huginn error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum HuginnError {
    // Network errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}) from {url}")]
    Api { status: u16, url: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    // Data errors
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A ranked story is missing from the table, or the ranked list is
    /// shorter than the number of wanted stories.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    #[error("no stories have been loaded yet")]
    NotLoaded,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A loader task panicked or was cancelled before reporting.
    #[error("story task failed: {0}")]
    Task(String),
}

impl HuginnError {
    /// Whether a retry of the same request may succeed.
    ///
    /// Connection failures, rate limiting and server-side (5xx) responses
    /// are transient. Decode, integrity and configuration errors are not:
    /// repeating the request yields the same payload.
    pub fn is_transient(&self) -> bool {
        match self {
            HuginnError::Transport(_) | HuginnError::RateLimited { .. } => true,
            HuginnError::Api { status, .. } => *status >= 500 || *status == 408,
            _ => false,
        }
    }

    /// Server-provided retry delay, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            HuginnError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for HuginnError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            HuginnError::Task("cancelled".to_string())
        } else {
            HuginnError::Task(format!("panicked: {err}"))
        }
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
