//! Append-only file logging.
//!
//! Every step of a session is traced to a log file, independent of console
//! output, so a failed run can be diagnosed after the fact. The filter
//! defaults to `debug` for this crate and honors `RUST_LOG` when set.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber writing to `path`.
///
/// The file is opened in append mode and created if missing. Call once at
/// startup, before any component runs.
///
/// # Errors
///
/// Fails when the log file cannot be opened for appending.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sku_updater=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
