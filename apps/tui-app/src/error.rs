//! Error types for the terminal application.

use std::path::PathBuf;

use snafu::Snafu;

/// Result type alias using the application's error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Terminal setup, drawing or input failed.
    #[snafu(display("terminal I/O failed: {source}"))]
    Terminal { source: std::io::Error },

    /// Log file could not be opened.
    #[snafu(display("failed to open log file at {}: {source}", path.display()))]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Log level directive could not be parsed.
    #[snafu(display("invalid log level '{filter}': {source}"))]
    LogFilter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },
}
