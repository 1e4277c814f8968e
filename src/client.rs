//! HTTP client for the auto-trading service's JSON API
//!
//! Consumed endpoints:
//! - GET  /api/check_connection   - exchange connectivity probe
//! - GET  /api/strategies         - live snapshots, bare array
//! - POST /api/execute_strategies - run all active strategies once
//! - POST /strategy/delete/{name} - remove a strategy
//! - GET  /api/trading_history    - records + stats, optional strategy filter

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::types::{
    ConnectionResponse, DeleteResponse, ExecuteResponse, HistoryResponse, StrategySnapshot,
};

/// Everything the dashboard needs from the trading service.
/// Split out as a trait so tests can run against an in-memory fake.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Probe the service's exchange connection
    async fn check_connection(&self) -> Result<ConnectionResponse>;

    /// Fetch live snapshots for every configured strategy
    async fn list_strategies(&self) -> Result<Vec<StrategySnapshot>>;

    /// Trigger one execution pass over all active strategies
    async fn execute_strategies(&self) -> Result<ExecuteResponse>;

    /// Remove a strategy and its records
    async fn delete_strategy(&self, strategy_name: &str) -> Result<DeleteResponse>;

    /// Fetch trade history, optionally limited to one strategy
    async fn trading_history(&self, strategy_name: Option<&str>) -> Result<HistoryResponse>;
}

/// reqwest-backed client for the trading service
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with the configured base URL and timeout
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DashboardError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Perform GET request
    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Perform GET request with query parameters
    async fn get_with_query<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Perform POST request (the service's mutating endpoints take no body)
    async fn post<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let response = self.http.post(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response, checking for errors
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(DashboardError::Transport(format!(
                "HTTP {status}: {error_text}"
            )));
        }

        response.json().await.map_err(DashboardError::from)
    }
}

#[async_trait]
impl BackendApi for ApiClient {
    async fn check_connection(&self) -> Result<ConnectionResponse> {
        self.get("/api/check_connection").await
    }

    async fn list_strategies(&self) -> Result<Vec<StrategySnapshot>> {
        self.get("/api/strategies").await
    }

    async fn execute_strategies(&self) -> Result<ExecuteResponse> {
        self.post("/api/execute_strategies").await
    }

    async fn delete_strategy(&self, strategy_name: &str) -> Result<DeleteResponse> {
        self.post(&delete_path(strategy_name)).await
    }

    async fn trading_history(&self, strategy_name: Option<&str>) -> Result<HistoryResponse> {
        match strategy_name {
            Some(name) => {
                self.get_with_query("/api/trading_history", &[("strategy_name", name)])
                    .await
            }
            None => self.get("/api/trading_history").await,
        }
    }
}

/// Strategy names go into the URL path and may contain anything
fn delete_path(strategy_name: &str) -> String {
    format!("/strategy/delete/{}", urlencoding::encode(strategy_name))
}

/// Outcome of a deletion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The confirmer declined; no request was issued
    Cancelled,
    /// The service removed the strategy
    Deleted,
}

/// Delete a strategy after an explicit confirmation step.
/// `confirm` receives the strategy name and decides whether to proceed;
/// declining guarantees no request reaches the service.
pub async fn delete_strategy_confirmed<F>(
    api: &dyn BackendApi,
    strategy_name: &str,
    confirm: F,
) -> Result<DeletionOutcome>
where
    F: FnOnce(&str) -> bool,
{
    if !confirm(strategy_name) {
        return Ok(DeletionOutcome::Cancelled);
    }

    let response = api.delete_strategy(strategy_name).await?;
    if response.success {
        Ok(DeletionOutcome::Deleted)
    } else {
        Err(DashboardError::Api(
            response
                .error
                .unwrap_or_else(|| "deletion failed".to_string()),
        ))
    }
}
