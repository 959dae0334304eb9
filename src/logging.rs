//! Structured logging for storybook builds.
//!
//! Dual output:
//! - **JSONL to file** (`<cache dir>/polaris-stories/storybook.jsonl`) for tooling
//! - **Compact to stderr** for developers running the build
//!
//! # Usage
//!
//! ```rust,ignore
//! use polaris_stories::logging;
//!
//! // Keep the guard alive until the build finishes, or buffered lines are lost
//! let _guard = logging::init();
//!
//! tracing::info!(event_type = "build", readmes = 12, "Stories generated");
//! ```

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "storybook.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize stderr + JSONL logging.
///
/// Falls back to stderr-only logging when the log file cannot be opened.
pub fn init() -> LoggingGuard {
    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_dir.join(LOG_FILE_NAME);

    // Default to info, allow override via RUST_LOG
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    // Without a log file the JSON layer is absent and stderr output remains
    let (json_layer, file_guard, open_error) = match open_log_writer(&log_path) {
        Ok((writer, guard)) => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);
            (Some(json_layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();

    match open_error {
        None => tracing::debug!(
            event_type = "logging",
            log_path = %log_path.display(),
            "JSONL logging initialized"
        ),
        Some(e) => tracing::warn!(
            error = %e,
            log_path = %log_path.display(),
            "Failed to open log file, logging to stderr only"
        ),
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Open the JSONL file for appending behind a non-blocking writer
fn open_log_writer(path: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(tracing_appender::non_blocking(file))
}

/// Log directory (`<cache dir>/polaris-stories`)
fn get_log_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|c| c.join("polaris-stories"))
        .unwrap_or_else(|| std::env::temp_dir().join("polaris-stories"))
}

/// Path to the JSONL log file
pub fn log_path() -> PathBuf {
    get_log_dir().join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_ends_with_jsonl_file() {
        let path = log_path();
        assert!(path.ends_with("polaris-stories/storybook.jsonl"));
    }

    #[test]
    fn test_log_writer_opens_and_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let (_writer, _guard) = open_log_writer(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_log_writer_reports_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        assert!(open_log_writer(&blocker.join(LOG_FILE_NAME)).is_err());
    }
}
