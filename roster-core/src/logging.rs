//! File logging for roster
//!
//! Diagnostics go to a daily file under `$XDG_STATE_HOME/roster/`, named
//! `roster.log.YYYY-MM-DD` (UTC). The terminal is left to user-facing output.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "roster.log";

/// Keeps the background writer alive; pending lines are flushed on drop.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Install the global subscriber writing to the XDG state directory.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    init_in(&Config::state_dir(), config)
}

/// Install the global subscriber writing into `log_dir`.
///
/// `RUST_LOG` wins over `logging.level` when set.
pub fn init_in(log_dir: &Path, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .max_log_files(config.max_files.max(1))
        .build(log_dir)
        .map_err(|e| Error::Config(format!("failed to create log file: {}", e)))?;
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {}", e)))?;

    tracing::info!(log_dir = %log_dir.display(), level = %config.level, "Logging initialized");

    Ok(LoggingGuard { _worker: worker })
}

/// Parse `logging.level` into a filter, rejecting unknown directives.
pub fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("invalid logging.level {:?}: {}", level, e)))
}

/// File written on `date`
pub fn log_file_for(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{}.{}", LOG_PREFIX, date.format("%Y-%m-%d")))
}

/// File receiving today's log lines
pub fn log_file_path() -> PathBuf {
    log_file_for(&Config::state_dir(), Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_is_dated() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(
            log_file_for(Path::new("/var/state/roster"), date),
            PathBuf::from("/var/state/roster/roster.log.2026-03-09")
        );
    }

    #[test]
    fn test_level_filter() {
        assert!(level_filter("debug").is_ok());
        assert!(level_filter("roster_core=trace,warn").is_ok());
        assert!(matches!(level_filter("roster=verbose"), Err(Error::Config(_))));
    }
}
