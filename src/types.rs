//! Common types for the dashboard client
//!
//! All shared data structures mirroring the trading service's JSON contract.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// Table cell label
    pub fn label(self) -> &'static str {
        match self {
            TradeAction::Buy => "Buy",
            TradeAction::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
        }
    }
}

/// One executed trade as returned by the history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub strategy_name: String,
    /// Timestamp string as recorded by the service, ISO or space-separated
    pub trade_time: String,
    #[serde(default)]
    pub coin_type: String,
    pub action: TradeAction,
    pub price: f64,
    pub volume: f64,
    /// Whether the trade went through operator confirmation
    #[serde(default)]
    pub confirmed: bool,
}

impl TradeRecord {
    /// Traded amount in quote currency
    pub fn amount(&self) -> f64 {
        self.price * self.volume
    }

    /// Parse the recorded timestamp. Returns None for malformed values;
    /// callers decide whether such rows pass a date filter.
    pub fn parsed_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.trade_time, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(&self.trade_time, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }
}

/// Strategy configuration as stored by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub strategy_name: String,
    pub investment_amount: f64,
    /// Cap on additional buy-in amount
    pub max_position: f64,
    /// Take-profit target amount
    pub take_profit: f64,
    /// Rebalance band as a percentage (0-100)
    pub auto_trade_percent: f64,
    pub coin_type: String,
    #[serde(default = "default_daily_trade_limit")]
    pub daily_trade_limit: u32,
    /// Trades above this amount require operator confirmation
    #[serde(default)]
    pub confirm_amount_threshold: f64,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
}

fn default_daily_trade_limit() -> u32 {
    5
}

fn default_is_active() -> bool {
    true
}

/// Point-in-time read of one strategy's live trading state.
/// `/api/strategies` returns a bare array of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySnapshot {
    pub config: StrategyConfig,
    pub current_balance: f64,
    pub current_price: f64,
    pub current_value: f64,
    pub trade_count: u64,
    pub today_trade_count: u32,
    pub net_profit: f64,
    pub buy_trigger_price: f64,
    pub sell_trigger_price: f64,
}

impl StrategySnapshot {
    /// Registry key for this snapshot
    pub fn name(&self) -> &str {
        &self.config.strategy_name
    }
}

/// Aggregate statistics over the fetched record set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_trades: u64,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub net_profit: f64,
    #[serde(default)]
    pub current_position_value: f64,
    #[serde(default)]
    pub realized_profit: f64,
}

/// One strategy's outcome from an execution pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub strategy_name: String,
    /// Action kind as reported by the service; kept as a string so new
    /// kinds never break decoding
    pub action: String,
    pub message: String,
}

impl ExecutionOutcome {
    /// Log label for the action kind
    pub fn action_label(&self) -> &'static str {
        if self.action == "take_profit" {
            "take profit"
        } else {
            "trade"
        }
    }
}

/// Response for GET /api/check_connection
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionResponse {
    pub success: bool,
    pub message: String,
}

/// Response for POST /api/execute_strategies
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<ExecutionOutcome>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response for GET /api/trading_history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub records: Vec<TradeRecord>,
    #[serde(default)]
    pub stats: Option<StatsSummary>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response for POST /strategy/delete/{name}
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
