//! Fixed-interval polling against the trading service
//!
//! Two independent timers drive the dashboard:
//! - the execution timer triggers one strategy pass per interval
//! - the refresh timer re-reads live strategy state per interval
//!
//! Both fire immediately on start. Every firing spawns its own task, so
//! a slow pass never delays the next one and overlapping passes run to
//! completion independently. A failed pass logs and ends; the timers
//! keep running. Each pass carries a UUID so interleaved log lines stay
//! attributable.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::board::StrategyBoard;
use crate::client::BackendApi;
use crate::config::Config;

/// The dashboard's polling engine
pub struct Poller {
    api: Arc<dyn BackendApi>,
    board: Arc<Mutex<StrategyBoard>>,
    execute_interval: Duration,
    refresh_interval: Duration,
}

impl Poller {
    pub fn new(
        api: Arc<dyn BackendApi>,
        board: Arc<Mutex<StrategyBoard>>,
        config: &Config,
    ) -> Self {
        Self {
            api,
            board,
            execute_interval: config.execute_interval(),
            refresh_interval: config.refresh_interval(),
        }
    }

    /// Start both timers; the first tick of each fires immediately
    pub fn start(self) -> PollerHandle {
        let Poller {
            api,
            board,
            execute_interval,
            refresh_interval,
        } = self;

        let execute_api = Arc::clone(&api);
        let execute_task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(execute_interval);
            loop {
                timer.tick().await;
                let api = Arc::clone(&execute_api);
                tokio::spawn(async move {
                    execute_tick(api.as_ref()).await;
                });
            }
        });

        let refresh_task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(refresh_interval);
            loop {
                timer.tick().await;
                let api = Arc::clone(&api);
                let board = Arc::clone(&board);
                tokio::spawn(async move {
                    refresh_tick(api.as_ref(), &board).await;
                });
            }
        });

        PollerHandle {
            tasks: vec![execute_task, refresh_task],
        }
    }
}

/// One execution pass. Per-strategy outcomes are logged; failures end
/// the pass without propagating.
pub async fn execute_tick(api: &dyn BackendApi) {
    let tick_id = Uuid::new_v4();
    match api.execute_strategies().await {
        Ok(response) if response.success => {
            for outcome in &response.results {
                info!(
                    tick = %tick_id,
                    "{}: {} - {}",
                    outcome.strategy_name,
                    outcome.action_label(),
                    outcome.message
                );
            }
        }
        Ok(response) => {
            error!(
                tick = %tick_id,
                "strategy execution rejected: {}",
                response.error.as_deref().unwrap_or("unknown error")
            );
        }
        Err(e) => {
            error!(tick = %tick_id, "strategy execution request failed: {e}");
        }
    }
}

/// One refresh pass: fetch snapshots and full-replace the matching
/// cards. On failure the board keeps its previous state; refresh
/// problems are routine, so they log at debug.
pub async fn refresh_tick(api: &dyn BackendApi, board: &Mutex<StrategyBoard>) {
    let tick_id = Uuid::new_v4();
    match api.list_strategies().await {
        Ok(snapshots) => {
            let applied = board.lock().unwrap().apply_all(&snapshots);
            debug!(
                tick = %tick_id,
                total = snapshots.len(),
                applied,
                "strategy state refreshed"
            );
        }
        Err(e) => {
            debug!(tick = %tick_id, "strategy refresh skipped: {e}");
        }
    }
}

/// Handles to the running timers
pub struct PollerHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl PollerHandle {
    /// Stop both timers and wait for them to wind down. In-flight passes
    /// were spawned separately and are abandoned, not awaited.
    pub async fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
        let _ = futures::future::join_all(self.tasks).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DashboardError, Result};
    use crate::types::{
        ConnectionResponse, DeleteResponse, ExecuteResponse, HistoryResponse, StrategyConfig,
        StrategySnapshot,
    };
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn test_config(execute_secs: u64, refresh_secs: u64) -> Config {
        Config {
            backend_url: "http://127.0.0.1:5000".to_string(),
            execute_interval_seconds: execute_secs,
            refresh_interval_seconds: refresh_secs,
            request_timeout_seconds: 10,
            history_page_length: 25,
        }
    }

    fn test_snapshot(name: &str, price: f64) -> StrategySnapshot {
        StrategySnapshot {
            config: StrategyConfig {
                strategy_name: name.to_string(),
                investment_amount: 2000.0,
                max_position: 400.0,
                take_profit: 3000.0,
                auto_trade_percent: 5.0,
                coin_type: "btctwd".to_string(),
                daily_trade_limit: 5,
                confirm_amount_threshold: 0.0,
                is_active: true,
                created_at: String::new(),
            },
            current_balance: 1.0,
            current_price: price,
            current_value: price,
            trade_count: 1,
            today_trade_count: 0,
            net_profit: 0.0,
            buy_trigger_price: price * 0.95,
            sell_trigger_price: price * 1.05,
        }
    }

    /// Counts calls; execution passes can be slowed per call
    struct FakeApi {
        execute_started: AtomicUsize,
        execute_completed: Mutex<Vec<usize>>,
        execute_delays: Mutex<VecDeque<Duration>>,
        list_calls: AtomicUsize,
        snapshots: Mutex<Vec<StrategySnapshot>>,
        list_fails: AtomicBool,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                execute_started: AtomicUsize::new(0),
                execute_completed: Mutex::new(Vec::new()),
                execute_delays: Mutex::new(VecDeque::new()),
                list_calls: AtomicUsize::new(0),
                snapshots: Mutex::new(Vec::new()),
                list_fails: AtomicBool::new(false),
            }
        }

        fn with_execute_delays(delays: Vec<Duration>) -> Self {
            let fake = Self::new();
            *fake.execute_delays.lock().unwrap() = delays.into_iter().collect();
            fake
        }
    }

    #[async_trait]
    impl BackendApi for FakeApi {
        async fn check_connection(&self) -> Result<ConnectionResponse> {
            unimplemented!("not used by these tests")
        }

        async fn list_strategies(&self) -> Result<Vec<StrategySnapshot>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.list_fails.load(Ordering::SeqCst) {
                return Err(DashboardError::Transport("connection refused".to_string()));
            }
            Ok(self.snapshots.lock().unwrap().clone())
        }

        async fn execute_strategies(&self) -> Result<ExecuteResponse> {
            let index = self.execute_started.fetch_add(1, Ordering::SeqCst) + 1;
            let delay = self.execute_delays.lock().unwrap().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.execute_completed.lock().unwrap().push(index);
            Ok(ExecuteResponse {
                success: true,
                results: vec![],
                error: None,
            })
        }

        async fn delete_strategy(&self, _: &str) -> Result<DeleteResponse> {
            unimplemented!("not used by these tests")
        }

        async fn trading_history(&self, _: Option<&str>) -> Result<HistoryResponse> {
            unimplemented!("not used by these tests")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_ticks_fire_immediately() {
        let fake = Arc::new(FakeApi::new());
        let api: Arc<dyn BackendApi> = fake.clone();
        let board = Arc::new(Mutex::new(StrategyBoard::new()));

        let handle = Poller::new(api, board, &test_config(60, 60)).start();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(fake.execute_started.load(Ordering::SeqCst), 1);
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_fire_on_cadence() {
        let fake = Arc::new(FakeApi::new());
        let api: Arc<dyn BackendApi> = fake.clone();
        let board = Arc::new(Mutex::new(StrategyBoard::new()));

        let handle = Poller::new(api, board, &test_config(60, 60)).start();
        // Covers the immediate tick plus t=60 and t=120
        tokio::time::sleep(Duration::from_secs(130)).await;

        assert_eq!(fake.execute_started.load(Ordering::SeqCst), 3);
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_passes_complete_independently() {
        // First pass takes two full intervals; later passes finish fast
        let fake = Arc::new(FakeApi::with_execute_delays(vec![
            Duration::from_secs(120),
            Duration::from_secs(1),
            Duration::from_secs(1),
        ]));
        let api: Arc<dyn BackendApi> = fake.clone();
        let board = Arc::new(Mutex::new(StrategyBoard::new()));

        let handle = Poller::new(api, board, &test_config(60, 60)).start();
        tokio::time::sleep(Duration::from_secs(130)).await;

        // Pass 2 started on schedule while pass 1 was still running, and
        // finished first; pass 1 was not cancelled by the overlap
        assert_eq!(fake.execute_started.load(Ordering::SeqCst), 3);
        let completed = fake.execute_completed.lock().unwrap().clone();
        assert_eq!(completed, vec![2, 1, 3]);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_both_timers() {
        let fake = Arc::new(FakeApi::new());
        let api: Arc<dyn BackendApi> = fake.clone();
        let board = Arc::new(Mutex::new(StrategyBoard::new()));

        let handle = Poller::new(api, board, &test_config(60, 60)).start();
        tokio::time::sleep(Duration::from_millis(5)).await;
        handle.shutdown().await;

        let executes = fake.execute_started.load(Ordering::SeqCst);
        let lists = fake.list_calls.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(fake.execute_started.load(Ordering::SeqCst), executes);
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), lists);
    }

    #[tokio::test]
    async fn test_refresh_tick_applies_snapshots() {
        let fake = FakeApi::new();
        *fake.snapshots.lock().unwrap() = vec![test_snapshot("btc-daily", 100.0)];

        let board = Mutex::new(StrategyBoard::from_snapshots(&[test_snapshot(
            "btc-daily", 50.0,
        )]));

        refresh_tick(&fake, &board).await;
        assert_eq!(board.lock().unwrap().card("btc-daily").unwrap().price, "100.00");
    }

    #[tokio::test]
    async fn test_refresh_tick_keeps_board_on_failure() {
        let fake = FakeApi::new();
        fake.list_fails.store(true, Ordering::SeqCst);

        let board = Mutex::new(StrategyBoard::from_snapshots(&[test_snapshot(
            "btc-daily", 50.0,
        )]));

        refresh_tick(&fake, &board).await;
        assert_eq!(board.lock().unwrap().card("btc-daily").unwrap().price, "50.00");
    }

    #[tokio::test]
    async fn test_execute_tick_survives_rejection_and_transport_failure() {
        // success: false
        struct Rejecting;
        #[async_trait]
        impl BackendApi for Rejecting {
            async fn check_connection(&self) -> Result<ConnectionResponse> {
                unimplemented!()
            }
            async fn list_strategies(&self) -> Result<Vec<StrategySnapshot>> {
                unimplemented!()
            }
            async fn execute_strategies(&self) -> Result<ExecuteResponse> {
                Ok(ExecuteResponse {
                    success: false,
                    results: vec![],
                    error: Some("engine offline".to_string()),
                })
            }
            async fn delete_strategy(&self, _: &str) -> Result<DeleteResponse> {
                unimplemented!()
            }
            async fn trading_history(&self, _: Option<&str>) -> Result<HistoryResponse> {
                unimplemented!()
            }
        }
        execute_tick(&Rejecting).await;

        // Transport error
        struct Unreachable;
        #[async_trait]
        impl BackendApi for Unreachable {
            async fn check_connection(&self) -> Result<ConnectionResponse> {
                unimplemented!()
            }
            async fn list_strategies(&self) -> Result<Vec<StrategySnapshot>> {
                unimplemented!()
            }
            async fn execute_strategies(&self) -> Result<ExecuteResponse> {
                Err(DashboardError::Transport("connection refused".to_string()))
            }
            async fn delete_strategy(&self, _: &str) -> Result<DeleteResponse> {
                unimplemented!()
            }
            async fn trading_history(&self, _: Option<&str>) -> Result<HistoryResponse> {
                unimplemented!()
            }
        }
        execute_tick(&Unreachable).await;
    }
}
