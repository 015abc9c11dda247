//! Log sink configuration and lifecycle.
//!
//! Two destinations are installed process-wide, exactly once, at startup:
//!
//! - a file sink: append-only, one record per line, no ANSI, everything down
//!   to the configured file level (default `trace`), written through a
//!   non-blocking background worker;
//! - a console sink on stderr with a higher threshold (default `debug`),
//!   overridable at runtime via `RUST_LOG`.
//!
//! Callers never see sink I/O errors; a record that cannot be written is
//! dropped inside the appender worker. Only the initial open of the file
//! destination is fatal.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::schema::LoggingConfig;

/// Error type for sink configuration.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {dir}: {source}")]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid log level {0:?}")]
    InvalidLevel(String),

    #[error("logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the file sink's background worker alive.
///
/// Hold this for the lifetime of the process; dropping it flushes buffered
/// records and stops the worker.
pub struct LogGuard {
    _file_worker: WorkerGuard,
}

/// Install the process-wide log sinks.
///
/// Fails fast if the log directory or file cannot be opened, or if a sink
/// has already been installed.
pub fn init(config: &LoggingConfig) -> Result<LogGuard, LoggingError> {
    let dir = Path::new(&config.dir);
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(&config.file);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::OpenFile {
            path: path.clone(),
            source,
        })?;

    let file_filter: LevelFilter = config
        .file_level
        .parse()
        .map_err(|_| LoggingError::InvalidLevel(config.file_level.clone()))?;
    config
        .console_level
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::InvalidLevel(config.console_level.clone()))?;

    let (file_writer, file_worker) = tracing_appender::non_blocking(file);

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.console_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()?;

    tracing::debug!(
        file = %path.display(),
        file_level = %config.file_level,
        console_level = %config.console_level,
        "Log sinks configured"
    );

    Ok(LogGuard {
        _file_worker: file_worker,
    })
}
