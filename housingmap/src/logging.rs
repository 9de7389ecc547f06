//! Logging setup.
//!
//! Logs go to stderr and to a daily-rotated file. The filter comes from
//! `RUST_LOG` when set, otherwise `info` (or `debug` when verbose).

use std::path::Path;

use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Prefix of the rotated log files.
pub const LOG_FILE_PREFIX: &str = "housingmap.log";

/// Keeps the background log writer alive. Hold it until the program exits.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "housingmap=debug,info"
    } else {
        "info"
    }
}

/// Installs the global tracing subscriber.
///
/// # Arguments
///
/// * `log_dir` - Directory for rotated log files (created if missing)
/// * `verbose` - Enable debug output for this crate
pub fn init_logging(log_dir: &Path, verbose: bool) -> Result<LoggingGuard, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::Directory {
        path: log_dir.display().to_string(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // Must be read before any threads are spawned
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(offset, Rfc3339);

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(timer.clone())
                .with_target(false),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_timer(timer)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
