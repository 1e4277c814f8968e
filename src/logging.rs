//! Centralized tracing setup: env-driven console logging plus an
//! optional structured JSON file log

use std::env;
use std::fs;
use std::sync::OnceLock;

use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Install the global subscriber. Console output is always on; set
/// LOG_TO_FILE=true for an additional JSON file under logs/.
/// CONSOLE_LOG_LEVEL and FILE_LOG_LEVEL pick the crate's level per sink;
/// everything else stays at warn.
pub fn init_logging() {
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_to_file = env::var("LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true";

    let env_filter_console =
        EnvFilter::try_new(format!("warn,autotrade_dashboard={console_log_level}"))
            .unwrap_or_else(|_| EnvFilter::new("autotrade_dashboard=info"));

    let console_layer = fmt::Layer::new().with_filter(env_filter_console);

    if log_to_file {
        let env_filter_file =
            EnvFilter::try_new(format!("warn,autotrade_dashboard={file_log_level}"))
                .unwrap_or_else(|_| EnvFilter::new("autotrade_dashboard=info"));

        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir).expect("Failed to create log directory");
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_appender = tracing_appender::rolling::never(log_dir, format!("{timestamp}.log"));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok();

        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_filter(env_filter_file);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry().with(console_layer).init();
    }
}
