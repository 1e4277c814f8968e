//! Binary entry point: seed the board and history, then hand off to the
//! background poller until Ctrl-C

use std::sync::{Arc, Mutex};

use tokio::signal;
use tracing::{error, info, warn};

use autotrade_dashboard::{
    ApiClient, BackendApi, BannerState, Config, ConnectionBanner, HistoryTable, Poller, Result,
    StrategyBoard, init_logging, refresh_history,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = Config::from_env();
    config.validate()?;
    info!(backend = %config.backend_url, "starting autotrade dashboard client");

    let api: Arc<dyn BackendApi> = Arc::new(ApiClient::new(&config)?);

    // Startup connectivity check, surfaced the same way the banner shows it
    let mut banner = ConnectionBanner::new();
    banner.begin_check();
    banner.finish(api.check_connection().await);
    match banner.state() {
        BannerState::Connected(message) => info!("backend connection: {message}"),
        BannerState::Failed(message) => warn!("backend connection: {message}"),
        _ => {}
    }

    // Seed the board and history once before the poller takes over.
    // The board's membership is fixed here; a restart re-reads it.
    let snapshots = match api.list_strategies().await {
        Ok(snapshots) => snapshots,
        Err(e) => {
            warn!("initial strategy fetch failed: {e}");
            Vec::new()
        }
    };
    info!(strategies = snapshots.len(), "strategy board ready");
    let board = Arc::new(Mutex::new(StrategyBoard::from_snapshots(&snapshots)));

    let mut history = HistoryTable::new(config.history_page_length);
    if let Ok(records) = refresh_history(api.as_ref(), &mut history, None).await {
        info!(records, "trading history ready");
    }

    let handle = Poller::new(Arc::clone(&api), Arc::clone(&board), &config).start();
    info!(
        execute_secs = config.execute_interval_seconds,
        refresh_secs = config.refresh_interval_seconds,
        "poller running, press Ctrl-C to stop"
    );

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("shutdown signal received, stopping poller");
            handle.shutdown().await;
            Ok(())
        }
        Err(err) => {
            error!("failed to listen for shutdown signal: {err}");
            handle.shutdown().await;
            Err(err.into())
        }
    }
}
