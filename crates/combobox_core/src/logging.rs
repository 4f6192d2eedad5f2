//! Tracing setup for hosts embedding the widget.
//!
//! Interactive terminals get console output only. Otherwise events go to a
//! daily rolling file under [`log_dir`] and INFO and above are echoed to
//! stdout. When the file cannot be opened the console is used alone.
//!
//! Filter resolution: explicit filter, then `COMBOBOX_LOG`, then `RUST_LOG`,
//! then [`default_log_filter`].

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::error::ComboboxError;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "COMBOBOX_LOG";

/// Where log events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    ConsoleAndFile,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    log_dir: PathBuf,
    output: LogOutput,
    filter: Option<String>,
    file_prefix: String,
}

impl LogConfig {
    /// Console only on a terminal, console plus file otherwise.
    pub fn new(log_dir: PathBuf) -> Self {
        let output = if atty::is(atty::Stream::Stdout) {
            LogOutput::Console
        } else {
            LogOutput::ConsoleAndFile
        };
        Self { log_dir, output, filter: None, file_prefix: "combobox".to_string() }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Prefix of the rolling file names (`{prefix}.YYYY-MM-DD.log`).
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn output(&self) -> LogOutput {
        self.output
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

/// Keeps the file writer alive. Dropping it flushes pending entries.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    worker: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Whether events are also written to a file.
    pub fn has_file_output(&self) -> bool {
        self.worker.is_some()
    }
}

/// Install the global subscriber. A subscriber the host installed first
/// is left in place.
pub fn init_logging(config: LogConfig) -> LoggingGuard {
    let worker = match config.output {
        LogOutput::Console => None,
        LogOutput::ConsoleAndFile => match install_file(&config) {
            Ok(worker) => Some(worker),
            Err(e) => {
                eprintln!("combobox: file logging unavailable ({e}), using console");
                None
            }
        },
    };

    if worker.is_none() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(resolve_filter(config.filter()))
            .with_target(false)
            .try_init();
    }
    LoggingGuard { worker }
}

fn install_file(config: &LogConfig) -> Result<WorkerGuard, ComboboxError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|e| {
        ComboboxError::config(format!("cannot create {}: {e}", config.log_dir.display()))
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(&config.log_dir)
        .map_err(|e| ComboboxError::config(format!("rolling appender: {e}")))?;
    let (file, worker) = tracing_appender::non_blocking(appender);

    let writer = std::io::stdout.with_max_level(tracing::Level::INFO).and(file);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(resolve_filter(config.filter()))
        .with_target(true)
        .try_init()
        .map_err(|e| ComboboxError::config(format!("subscriber: {e}")))?;

    Ok(worker)
}

fn resolve_filter(explicit: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::new(default_log_filter());
    match explicit {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| fallback()),
        None => EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| fallback()),
    }
}

/// Verbose in debug builds, INFO in release.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,combobox=trace,combobox_core=debug"
    } else {
        "warn,combobox=info,combobox_core=info"
    }
}

/// `<local data dir>/combobox/logs`, or under the temp dir when there is none.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(std::env::temp_dir).join("combobox").join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig::new(dir.path().to_path_buf())
            .with_filter("combobox_core=trace")
            .with_output(LogOutput::Console)
            .with_file_prefix("widget");
        assert_eq!(config.filter(), Some("combobox_core=trace"));
        assert_eq!(config.output(), LogOutput::Console);
        assert_eq!(config.log_dir(), dir.path());
    }

    #[test]
    fn test_file_output_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("logs");
        let config = LogConfig::new(nested.clone()).with_output(LogOutput::ConsoleAndFile);

        // Another test may own the global subscriber; the directory is made first.
        let _ = install_file(&config);
        assert!(nested.is_dir());
    }

    #[test]
    fn test_log_dir_is_namespaced() {
        assert!(log_dir().ends_with("combobox/logs"));
    }

    #[test]
    fn test_malformed_filter_uses_default() {
        let _ = resolve_filter(Some("=[broken"));
    }
}
