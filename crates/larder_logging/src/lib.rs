//! Shared logging utilities for larder binaries.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str =
    "larder=info,larder_store=info,larder_engine=info,larder_dashboard=info";

/// Logging configuration shared by larder binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Keep stdout clean (interactive scan prompts, --json output modes);
    /// console logs go to stderr at warn level.
    pub quiet_console: bool,
}

/// Initialize tracing with a daily-rolling file writer and console output.
///
/// Returns the appender guard; drop it only at process exit or buffered
/// log lines are lost.
pub fn init_logging(
    config: LogConfig<'_>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let mut guard = None;
    let file_layer = match ensure_logs_dir() {
        Ok(log_dir) => {
            let appender =
                tracing_appender::rolling::daily(log_dir, format!("{}.log", config.app_name));
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(env_filter),
            )
        }
        Err(err) => {
            eprintln!("Warning: failed to create logs directory: {}", err);
            None
        }
    };

    let console_filter = if config.quiet_console {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

/// Get the larder home directory: ~/.larder
pub fn larder_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("LARDER_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .map(|home| home.join(".larder"))
        .unwrap_or_else(|| PathBuf::from(".larder"))
}

/// Get the snapshot data directory: ~/.larder/data
pub fn data_dir() -> PathBuf {
    larder_home().join("data")
}

/// Get the logs directory: ~/.larder/logs
pub fn logs_dir() -> PathBuf {
    larder_home().join("logs")
}

/// Ensure the snapshot data directory exists.
pub fn ensure_data_dir() -> Result<PathBuf> {
    let data = data_dir();
    fs::create_dir_all(&data)
        .with_context(|| format!("Failed to create data directory: {}", data.display()))?;
    Ok(data)
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}
