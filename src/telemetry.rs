//! Logging setup
//!
//! The terminal belongs to the TUI, so events go to a daily rolling file
//! instead of stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
///
/// Keep the returned guard alive for the whole run, dropping it flushes and
/// stops the background writer.
pub fn init_tracing(log_dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("create log dir {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "smart-wallet.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init()
        .context("install tracing subscriber")?;

    Ok(guard)
}
