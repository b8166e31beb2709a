//! File-backed `tracing` setup. The terminal belongs to the TUI, so log lines
//! go to `<data dir>/logs/playground.log` instead of stdout.

use std::fs;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const LOG_FILE_NAME: &str = "playground.log";

/// Install the global subscriber. Uses a blocking appender; the app is single
/// threaded and writes a handful of lines per user action.
pub fn init(config: &AppConfig) -> Result<()> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir).context("failed to create log directory")?;

    let filter = EnvFilter::try_new(&config.settings.log_level)
        .with_context(|| format!("invalid log level '{}'", config.settings.log_level))?;
    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
