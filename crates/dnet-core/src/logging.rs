//! Tracing subscriber setup.
//!
//! Headless commands log to stderr. The interactive TUI owns the terminal,
//! so it logs to a daily-rolling file under `$DNET_HOME/logs` instead.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "DNET_LOG";

const LOG_FILE_PREFIX: &str = "dnet.log";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs a stderr subscriber.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_stderr(fallback_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(env_filter(fallback_filter))
        .try_init()
        .context("install stderr log subscriber")
}

/// Installs a file subscriber writing into `dir`.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// whole interactive session.
///
/// # Errors
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn init_file(dir: &Path, fallback_filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(env_filter(fallback_filter))
        .try_init()
        .context("install file log subscriber")?;

    Ok(guard)
}
