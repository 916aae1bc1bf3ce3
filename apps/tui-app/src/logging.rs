//! Tracing setup.
//!
//! The terminal belongs to the UI while a session runs, so logs only go to a
//! file, and only when one was requested.

use std::fs::OpenOptions;
use std::path::Path;

use snafu::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::{LogFileSnafu, LogFilterSnafu, Result};

/// Installs the global subscriber writing to `log_file`.
///
/// `RUST_LOG` takes precedence over `level`. The returned guard must be kept
/// alive until exit so buffered lines are flushed.
pub fn init(log_file: Option<&Path>, level: &str) -> Result<Option<WorkerGuard>> {
    let Some(path) = log_file else {
        return Ok(None);
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_level(level)?,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(LogFileSnafu { path })?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

fn parse_level(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).context(LogFilterSnafu { filter: level })
}
