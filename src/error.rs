//! Error types for the dashboard client
//!
//! Uses thiserror for ergonomic error definitions.
//! All errors are non-panicking: a failed refresh or execution pass is
//! logged and skipped, never allowed to take the poller down.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard client errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The service answered but reported failure (`success: false`)
    #[error("Service error: {0}")]
    Api(String),

    /// HTTP transport errors (connection refused, timeout, non-2xx status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors (signal handling, log directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Strategy form violations, every failed rule collected
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Date interval whose start falls after its end
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Transport(err.to_string())
    }
}
