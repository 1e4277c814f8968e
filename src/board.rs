//! Live strategy board
//!
//! Keyed registry of per-strategy view state:
//! - one `StrategyCard` per strategy, full-replaced on every refresh
//! - numeric thresholds (trade-count warning, near-trigger highlights)
//!   derived from snapshot numbers, never re-parsed from display text
//! - connection banner state machine for the service probe
//!
//! The registry is populated once at startup; snapshots for unknown keys
//! are dropped silently so strategies can come and go between refreshes.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{ConnectionResponse, StrategySnapshot};

/// Sign-derived style for a net-profit figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitTone {
    Positive,
    Negative,
    Neutral,
}

impl ProfitTone {
    /// Exactly zero is neutral, not a gain
    pub fn from_value(value: f64) -> Self {
        if value > 0.0 {
            ProfitTone::Positive
        } else if value < 0.0 {
            ProfitTone::Negative
        } else {
            ProfitTone::Neutral
        }
    }

    /// Style class equivalent; neutral renders unstyled
    pub fn class(self) -> &'static str {
        match self {
            ProfitTone::Positive => "positive",
            ProfitTone::Negative => "negative",
            ProfitTone::Neutral => "",
        }
    }
}

/// Warning turns on when today's count reaches one below the daily limit
pub fn trade_count_warning(today_count: u32, daily_limit: u32) -> bool {
    today_count >= daily_limit.saturating_sub(1)
}

/// Buy side is "near" when price has fallen to within 1% above the trigger
pub fn near_buy_trigger(current_price: f64, buy_trigger: f64) -> bool {
    current_price <= buy_trigger * 1.01
}

/// Sell side is "near" when price has risen to within 1% below the trigger
pub fn near_sell_trigger(current_price: f64, sell_trigger: f64) -> bool {
    current_price >= sell_trigger * 0.99
}

/// Display-ready state for one strategy.
/// Strings are write-only output; warnings derive from the numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyCard {
    pub strategy_name: String,
    pub coin_type: String,
    pub is_active: bool,
    /// Coin balance, 4 decimals
    pub balance: String,
    /// Current price, 2 decimals
    pub price: String,
    /// Market value of the position, 2 decimals
    pub market_value: String,
    pub buy_trigger: String,
    pub sell_trigger: String,
    /// "today/limit", e.g. "3/5"
    pub today_trades: String,
    pub total_trades: u64,
    pub net_profit: String,
    pub profit_tone: ProfitTone,
    pub count_warning: bool,
    pub near_buy: bool,
    pub near_sell: bool,
}

impl StrategyCard {
    /// Blank card shown until the first snapshot arrives
    pub fn placeholder(strategy_name: &str) -> Self {
        Self {
            strategy_name: strategy_name.to_string(),
            coin_type: String::new(),
            is_active: true,
            balance: "--".to_string(),
            price: "--".to_string(),
            market_value: "--".to_string(),
            buy_trigger: "--".to_string(),
            sell_trigger: "--".to_string(),
            today_trades: "--".to_string(),
            total_trades: 0,
            net_profit: "--".to_string(),
            profit_tone: ProfitTone::Neutral,
            count_warning: false,
            near_buy: false,
            near_sell: false,
        }
    }

    /// Build the full card from one snapshot. Every field is computed here;
    /// nothing is carried over from the previous state.
    pub fn from_snapshot(snapshot: &StrategySnapshot) -> Self {
        let config = &snapshot.config;
        Self {
            strategy_name: config.strategy_name.clone(),
            coin_type: config.coin_type.clone(),
            is_active: config.is_active,
            balance: format!("{:.4}", snapshot.current_balance),
            price: format!("{:.2}", snapshot.current_price),
            market_value: format!("{:.2}", snapshot.current_value),
            buy_trigger: format!("{:.2}", snapshot.buy_trigger_price),
            sell_trigger: format!("{:.2}", snapshot.sell_trigger_price),
            today_trades: format!(
                "{}/{}",
                snapshot.today_trade_count, config.daily_trade_limit
            ),
            total_trades: snapshot.trade_count,
            net_profit: format!("{:.2}", snapshot.net_profit),
            profit_tone: ProfitTone::from_value(snapshot.net_profit),
            count_warning: trade_count_warning(
                snapshot.today_trade_count,
                config.daily_trade_limit,
            ),
            near_buy: near_buy_trigger(snapshot.current_price, snapshot.buy_trigger_price),
            near_sell: near_sell_trigger(snapshot.current_price, snapshot.sell_trigger_price),
        }
    }
}

/// Keyed registry of strategy cards, ordered by name for stable display
#[derive(Debug, Default)]
pub struct StrategyBoard {
    cards: BTreeMap<String, StrategyCard>,
}

impl StrategyBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy with a placeholder card
    pub fn register(&mut self, strategy_name: &str) {
        self.cards.insert(
            strategy_name.to_string(),
            StrategyCard::placeholder(strategy_name),
        );
    }

    /// Build the board from the startup snapshot fetch
    pub fn from_snapshots(snapshots: &[StrategySnapshot]) -> Self {
        let mut board = Self::new();
        for snapshot in snapshots {
            board
                .cards
                .insert(snapshot.name().to_string(), StrategyCard::from_snapshot(snapshot));
        }
        board
    }

    /// Full-replace the card for this snapshot's strategy.
    /// Returns false (and changes nothing) when the key is not registered.
    pub fn apply(&mut self, snapshot: &StrategySnapshot) -> bool {
        match self.cards.get_mut(snapshot.name()) {
            Some(card) => {
                *card = StrategyCard::from_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    /// Apply a refresh batch; returns how many cards were updated
    pub fn apply_all(&mut self, snapshots: &[StrategySnapshot]) -> usize {
        snapshots.iter().filter(|s| self.apply(s)).count()
    }

    pub fn card(&self, strategy_name: &str) -> Option<&StrategyCard> {
        self.cards.get(strategy_name)
    }

    /// Drop a card after its strategy was deleted
    pub fn remove(&mut self, strategy_name: &str) -> Option<StrategyCard> {
        self.cards.remove(strategy_name)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in display order
    pub fn cards(&self) -> impl Iterator<Item = &StrategyCard> {
        self.cards.values()
    }
}

/// Connection banner states
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BannerState {
    #[default]
    Idle,
    Checking,
    /// Probe succeeded; carries the service's message
    Connected(String),
    /// Probe failed or could not be made; carries the shown message
    Failed(String),
}

/// State machine for the connection-check banner.
/// `begin_check` refuses re-entry while a check is in flight, the analog
/// of disabling the button until the request settles.
#[derive(Debug, Default)]
pub struct ConnectionBanner {
    state: BannerState,
}

impl ConnectionBanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the checking state. Returns false when a check is already
    /// running; callers must not issue a second probe.
    pub fn begin_check(&mut self) -> bool {
        if self.state == BannerState::Checking {
            return false;
        }
        self.state = BannerState::Checking;
        true
    }

    /// Settle the banner from the probe result. Service-reported failure
    /// keeps the service's message; transport failure gets a generic one.
    pub fn finish(&mut self, result: Result<ConnectionResponse>) {
        self.state = match result {
            Ok(response) if response.success => BannerState::Connected(response.message),
            Ok(response) => BannerState::Failed(response.message),
            Err(_) => BannerState::Failed("Could not reach the trading service".to_string()),
        };
    }

    pub fn state(&self) -> &BannerState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == BannerState::Checking
    }
}
