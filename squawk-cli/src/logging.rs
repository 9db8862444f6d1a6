//! Tracing setup for the launcher, grounded on the node launcher's own `init_tracing`: an
//! `EnvFilter` seeded from `-verbose`, and an optional non-blocking file writer so a long-
//! running isolate's trace output doesn't block the interpreter loop on I/O.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Holds the non-blocking writer's worker guard; dropping it flushes buffered log lines, so the
/// caller must keep it alive for the process lifetime.
pub struct LoggingGuard(#[allow(dead_code)] Option<WorkerGuard>);

pub fn init(verbose: bool) -> Result<LoggingGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter_spec = format!("{default_level},squawk={default_level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_spec));

    if let Ok(path) = std::env::var("SQUAWK_LOG_FILE") {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {path}"))?;
        let (writer, guard) = non_blocking(file);
        fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .ok();
        return Ok(LoggingGuard(Some(guard)));
    }

    fmt().with_env_filter(env_filter).try_init().ok();
    Ok(LoggingGuard(None))
}
