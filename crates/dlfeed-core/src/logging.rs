//! Logging setup. Events go to `dlfeed.log` in the XDG state dir; callers
//! fall back to [`init_logging_stderr`] when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,dlfeed=debug";

/// Build a filter from `RUST_LOG`-style directives. Missing, blank or
/// malformed input gives [`DEFAULT_FILTER`].
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn filter_from_env() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

pub fn log_file_path() -> Result<PathBuf> {
    crate::config::state_path("dlfeed.log")
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log dir {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Install the global subscriber writing to [`log_file_path`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    // `&File` is a writer, so a shared handle serves every event.
    let file = Arc::new(open_append(&path)?);

    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(file)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))?;

    tracing::info!(path = %path.display(), "dlfeed logging started");
    Ok(())
}

pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
