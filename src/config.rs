//! Configuration management for the dashboard client

use std::env;
use std::time::Duration;

use crate::error::{DashboardError, Result};

/// Dashboard client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the auto-trading service
    pub backend_url: String,

    /// Seconds between strategy execution passes
    pub execute_interval_seconds: u64,

    /// Seconds between strategy state refreshes
    pub refresh_interval_seconds: u64,

    /// Per-request HTTP timeout in seconds
    pub request_timeout_seconds: u64,

    /// Rows per page in the trade history table
    pub history_page_length: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// the values the service ships with
    pub fn from_env() -> Self {
        Self {
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),

            execute_interval_seconds: env::var("EXECUTE_INTERVAL_SECONDS")
                .map(|v| v.parse().unwrap_or(60))
                .unwrap_or(60),

            refresh_interval_seconds: env::var("REFRESH_INTERVAL_SECONDS")
                .map(|v| v.parse().unwrap_or(60))
                .unwrap_or(60),

            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .map(|v| v.parse().unwrap_or(10))
                .unwrap_or(10),

            history_page_length: env::var("HISTORY_PAGE_LENGTH")
                .map(|v| v.parse().unwrap_or(25))
                .unwrap_or(25),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(DashboardError::Config(
                "backend_url must start with http:// or https://".into(),
            ));
        }
        if self.execute_interval_seconds == 0 {
            return Err(DashboardError::Config(
                "execute_interval_seconds must be positive".into(),
            ));
        }
        if self.refresh_interval_seconds == 0 {
            return Err(DashboardError::Config(
                "refresh_interval_seconds must be positive".into(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(DashboardError::Config(
                "request_timeout_seconds must be positive".into(),
            ));
        }
        if self.history_page_length == 0 {
            return Err(DashboardError::Config(
                "history_page_length must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Execution pass cadence
    pub fn execute_interval(&self) -> Duration {
        Duration::from_secs(self.execute_interval_seconds)
    }

    /// State refresh cadence
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
