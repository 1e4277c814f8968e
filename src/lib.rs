//! Autotrade Dashboard - Monitoring Client for the Auto-Trading Service
//!
//! A native companion client that keeps a local, render-ready view of the
//! trading backend.
//!
//! # Architecture
//! - Background poller drives strategy execution and board refreshes
//! - HTTP client wraps the backend's JSON API
//! - In-memory board, history table, and form models hold presentation state
//!
//! # Features
//! - Per-strategy cards with trigger proximity and trade-count warnings
//! - Trading history with date presets, sorting, and paging
//! - Strategy form validation with investment-derived defaults

// Clippy configuration for dashboard code patterns
#![allow(clippy::struct_excessive_bools)] // Card flags map 1:1 to UI badges
#![allow(clippy::doc_markdown)] // Doc style flexibility

mod board;
mod client;
mod config;
mod error;
mod form;
mod history;
mod logging;
mod poller;
mod types;

pub use board::{
    BannerState, ConnectionBanner, ProfitTone, StrategyBoard, StrategyCard, near_buy_trigger,
    near_sell_trigger, trade_count_warning,
};
pub use client::{ApiClient, BackendApi, DeletionOutcome, delete_strategy_confirmed};
pub use config::Config;
pub use error::{DashboardError, Result};
pub use form::{NumericField, StrategyForm, Submission};
pub use history::{
    DateInterval, HistoryRow, HistoryTable, SortColumn, SortDirection, SortOrder, StatTone,
    StatsPanel, refresh_history,
};
pub use logging::init_logging;
pub use poller::{Poller, PollerHandle, execute_tick, refresh_tick};
pub use types::*;
