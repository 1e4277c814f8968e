//! Trade history table and date-range filtering
//!
//! - `HistoryTable` holds the most recent successful fetch; every reload
//!   replaces rows and stats together, from the same response
//! - default order is newest first; a user-chosen sort survives reloads
//! - date filtering takes the `DateInterval` as an explicit argument on
//!   each draw, so no filter state can leak into later draws
//! - record timestamps are parsed once at load; rows that fail to parse
//!   are excluded while a date filter is active

use std::cmp::Ordering;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use tracing::{debug, error};

use crate::client::BackendApi;
use crate::error::{DashboardError, Result};
use crate::types::{StatsSummary, TradeAction, TradeRecord};

/// Closed calendar-date interval: both endpoint days count in full,
/// from the start's midnight through the last second of the end day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateInterval {
    /// Build an interval, refusing inverted bounds
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    fn span(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Just the given day
    pub fn single_day(day: NaiveDate) -> Self {
        Self::span(day, day)
    }

    pub fn today(today: NaiveDate) -> Self {
        Self::single_day(today)
    }

    pub fn yesterday(today: NaiveDate) -> Self {
        let day = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        Self::single_day(day)
    }

    /// The last `days` days ending today; `last_days(today, 7)` covers
    /// today and the six days before it
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.saturating_sub(1));
        let start = today.checked_sub_days(Days::new(back)).unwrap_or(today);
        Self::span(start, today)
    }

    /// The whole calendar month containing today
    pub fn this_month(today: NaiveDate) -> Self {
        let start = month_start(today);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .unwrap_or(today);
        Self::span(start, end)
    }

    /// The whole previous calendar month
    pub fn last_month(today: NaiveDate) -> Self {
        let this_start = month_start(today);
        let start = this_start
            .checked_sub_months(Months::new(1))
            .unwrap_or(this_start);
        let end = this_start
            .checked_sub_days(Days::new(1))
            .unwrap_or(this_start);
        Self::span(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the instant falls inside the interval. Comparison is by
    /// calendar day, so 23:59:59 on the end day is in and the next
    /// midnight is out.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        let day = instant.date();
        day >= self.start && day <= self.end
    }
}

fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Table columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    TradeTime,
    StrategyName,
    CoinType,
    Action,
    Price,
    Volume,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active table ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    /// Newest trades first
    fn default() -> Self {
        Self {
            column: SortColumn::TradeTime,
            direction: SortDirection::Descending,
        }
    }
}

impl SortOrder {
    fn compare(self, a: &HistoryRow, b: &HistoryRow) -> Ordering {
        let ordering = match self.column {
            SortColumn::TradeTime => a.timestamp.cmp(&b.timestamp),
            SortColumn::StrategyName => a.record.strategy_name.cmp(&b.record.strategy_name),
            SortColumn::CoinType => a.record.coin_type.cmp(&b.record.coin_type),
            SortColumn::Action => a.record.action.label().cmp(b.record.action.label()),
            SortColumn::Price => a.record.price.total_cmp(&b.record.price),
            SortColumn::Volume => a.record.volume.total_cmp(&b.record.volume),
            SortColumn::Amount => a.record.amount().total_cmp(&b.record.amount()),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// One table row; the timestamp is parsed once at load
#[derive(Debug, Clone)]
pub struct HistoryRow {
    record: TradeRecord,
    timestamp: Option<NaiveDateTime>,
}

impl HistoryRow {
    fn new(record: TradeRecord) -> Self {
        let timestamp = record.parsed_time();
        Self { record, timestamp }
    }

    pub fn record(&self) -> &TradeRecord {
        &self.record
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    /// Rendered cells in column order: time, strategy, coin, action,
    /// price (2 dp), volume (8 dp), amount (2 dp)
    pub fn cells(&self) -> [String; 7] {
        [
            self.record.trade_time.clone(),
            self.record.strategy_name.clone(),
            self.record.coin_type.clone(),
            self.record.action.label().to_string(),
            format!("{:.2}", self.record.price),
            format!("{:.8}", self.record.volume),
            format!("{:.2}", self.record.amount()),
        ]
    }

    /// Badge tone for the action cell
    pub fn action_tone(&self) -> StatTone {
        StatTone::from_action(self.record.action)
    }
}

/// Success/danger styling for the stats cards and the action badges;
/// the stats panel treats zero as a gain, unlike the per-strategy cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTone {
    Success,
    Danger,
}

impl StatTone {
    pub fn from_net_profit(value: f64) -> Self {
        if value >= 0.0 {
            StatTone::Success
        } else {
            StatTone::Danger
        }
    }

    /// Badge tone for an action cell: buys render success, sells danger
    pub fn from_action(action: TradeAction) -> Self {
        match action {
            TradeAction::Buy => StatTone::Success,
            TradeAction::Sell => StatTone::Danger,
        }
    }

    /// Style class equivalent
    pub fn class(self) -> &'static str {
        match self {
            StatTone::Success => "success",
            StatTone::Danger => "danger",
        }
    }
}

/// Display-ready stats cards, rendered verbatim from the service's
/// aggregates (never recomputed from visible rows)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsPanel {
    pub total_trades: String,
    pub total_amount: String,
    pub avg_amount: String,
    pub net_profit: String,
    pub net_profit_tone: StatTone,
}

impl StatsPanel {
    pub fn from_stats(stats: &StatsSummary) -> Self {
        Self {
            total_trades: stats.total_trades.to_string(),
            total_amount: format!("{:.2} TWD", stats.total_amount),
            avg_amount: format!("{:.2} TWD", stats.avg_amount),
            net_profit: format!("{:.2} TWD", stats.net_profit),
            net_profit_tone: StatTone::from_net_profit(stats.net_profit),
        }
    }
}

/// Client-side table over the most recent successful history fetch
#[derive(Debug)]
pub struct HistoryTable {
    rows: Vec<HistoryRow>,
    stats: Option<StatsSummary>,
    sort: SortOrder,
    page_length: usize,
}

impl HistoryTable {
    pub fn new(page_length: usize) -> Self {
        Self {
            rows: Vec::new(),
            stats: None,
            sort: SortOrder::default(),
            page_length: page_length.max(1),
        }
    }

    /// Replace the whole table from one response. Rows and stats always
    /// move together; the sort choice survives the reload.
    pub fn load(&mut self, records: Vec<TradeRecord>, stats: StatsSummary) {
        self.rows = records.into_iter().map(HistoryRow::new).collect();
        self.stats = Some(stats);
    }

    /// Override the table ordering; stays until changed again
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn stats(&self) -> Option<&StatsSummary> {
        self.stats.as_ref()
    }

    /// Stats cards for the current contents; None before the first load
    pub fn stats_panel(&self) -> Option<StatsPanel> {
        self.stats.as_ref().map(StatsPanel::from_stats)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All rows in the current order
    pub fn draw(&self) -> Vec<&HistoryRow> {
        self.draw_where(|_| true)
    }

    /// Rows whose trade day falls inside the interval. The interval lives
    /// only in this call; the next draw starts from the full row set.
    pub fn draw_filtered(&self, interval: &DateInterval) -> Vec<&HistoryRow> {
        self.draw_where(|row| row.timestamp.is_some_and(|t| interval.contains(t)))
    }

    /// Rows passing an arbitrary predicate, in the current order
    pub fn draw_where<P>(&self, keep: P) -> Vec<&HistoryRow>
    where
        P: Fn(&HistoryRow) -> bool,
    {
        let mut drawn: Vec<&HistoryRow> = self.rows.iter().filter(|row| keep(row)).collect();
        drawn.sort_by(|a, b| self.sort.compare(a, b));
        drawn
    }

    /// Number of pages a drawn set spans
    pub fn page_count(&self, drawn_len: usize) -> usize {
        drawn_len.div_ceil(self.page_length)
    }

    /// One page of a drawn set; out-of-range pages are empty
    pub fn page<'a, 'r>(
        &self,
        drawn: &'a [&'r HistoryRow],
        page_index: usize,
    ) -> &'a [&'r HistoryRow] {
        let start = page_index.saturating_mul(self.page_length);
        if start >= drawn.len() {
            return &[];
        }
        let end = (start + self.page_length).min(drawn.len());
        &drawn[start..end]
    }
}

/// Fetch records and stats and reload the table. On service-reported or
/// transport failure the previous contents stay and the error is logged.
pub async fn refresh_history(
    api: &dyn BackendApi,
    table: &mut HistoryTable,
    strategy_name: Option<&str>,
) -> Result<usize> {
    match api.trading_history(strategy_name).await {
        Ok(response) if response.success => {
            let count = response.records.len();
            table.load(response.records, response.stats.unwrap_or_default());
            debug!(rows = count, strategy = strategy_name, "trade history reloaded");
            Ok(count)
        }
        Ok(response) => {
            let reason = response
                .error
                .unwrap_or_else(|| "unknown error".to_string());
            error!(error = %reason, "trade history fetch rejected");
            Err(DashboardError::Api(reason))
        }
        Err(e) => {
            error!("trade history request failed: {e}");
            Err(e)
        }
    }
}
