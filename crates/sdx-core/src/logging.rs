//! File logging setup.
//!
//! The TUI owns stdout/stderr while it runs, so all `tracing` output goes to a
//! daily-rolling file under ${SDX_HOME}/logs instead of the terminal.
//!
//! Filter resolution order:
//! 1. `SDX_LOG` environment variable (`EnvFilter` syntax)
//! 2. `log_level` from config
//! 3. `info`

use std::path::Path;

use anyhow::{Context, Result};
pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SDX_LOG";

const LOG_FILE_PREFIX: &str = "sdx.log";
const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber writing to ${SDX_HOME}/logs.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// lifetime of the process.
///
/// # Errors
/// Returns an error if the log directory cannot be created, the filter is
/// invalid, or a global subscriber is already installed.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), config)
}

/// Same as [`init`] but writes into an explicit directory.
///
/// # Errors
/// See [`init`].
pub fn init_in(dir: &Path, config: &Config) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log dir {}", dir.display()))?;

    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), config)?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}

fn build_filter(env_value: Option<&str>, config: &Config) -> Result<EnvFilter> {
    let directive = env_value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            config
                .log_level
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or(DEFAULT_FILTER);

    EnvFilter::try_new(directive).with_context(|| format!("Invalid log filter: {directive}"))
}
