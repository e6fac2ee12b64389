//! # Logging Utilities
//!
//! Logging infrastructure for sigminer using `tracing`.
//!
//! Console output always goes to **stderr**: stdout belongs to the command
//! results, which other tools may be parsing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sigminer_utils::init_logging;
//!
//! // Keep the guard alive for as long as the program logs
//! let _guard = init_logging().expect("Failed to initialize logging");
//!
//! tracing::warn!("visible by default");
//! tracing::debug!("visible with RUST_LOG=debug");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: filter directives (e.g. `debug`, `sigminer_core=trace`)
//! - `SIGMINER_LOG_FORMAT`: `pretty` (default) or `json`
//! - `SIGMINER_LOG_FILE`: optional log file. A file path is rolled daily; an
//!   existing directory receives a `YYYY-MM-DD-sigminer.log` file.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::env;

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "SIGMINER_LOG_FORMAT";
/// Environment variable naming the optional log file.
pub const FILE_ENV: &str = "SIGMINER_LOG_FILE";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Where file output goes, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFile
{
    /// Rolled daily; the date is appended to the file name.
    Rolling(PathBuf),
    /// A dated file inside this directory, never rolled.
    InDirectory(PathBuf),
}

impl LogFile
{
    fn appender(&self) -> RollingFileAppender
    {
        match self {
            LogFile::Rolling(path) => {
                let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
                tracing_appender::rolling::daily(dir, path.file_name().unwrap_or_default())
            }
            LogFile::InDirectory(dir) => {
                let today = Utc::now().format("%Y-%m-%d");
                tracing_appender::rolling::never(dir, format!("{today}-sigminer.log"))
            }
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig
{
    /// Explicit level; overrides `RUST_LOG` when set.
    pub level: Option<LogLevel>,
    pub format: LogFormat,
    pub file: Option<LogFile>,
}

impl LoggingConfig
{
    /// Read `SIGMINER_LOG_FORMAT` and `SIGMINER_LOG_FILE`.
    ///
    /// ## Errors
    ///
    /// Returns [`LoggingError::InvalidFormat`] for an unrecognised format.
    pub fn from_env() -> Result<Self, LoggingError>
    {
        Self::from_vars(env::var(FORMAT_ENV).ok().as_deref(), env::var_os(FILE_ENV).map(PathBuf::from))
    }

    /// Build from already-read variable values.
    ///
    /// ## Errors
    ///
    /// Returns [`LoggingError::InvalidFormat`] for an unrecognised format.
    pub fn from_vars(format: Option<&str>, file: Option<PathBuf>) -> Result<Self, LoggingError>
    {
        let format = match format.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => LogFormat::from_str(value).map_err(LoggingError::InvalidFormat)?,
            None => LogFormat::default(),
        };
        let file = file.filter(|path| !path.as_os_str().is_empty()).map(|path| {
            if path.is_dir() {
                LogFile::InDirectory(path)
            } else {
                LogFile::Rolling(path)
            }
        });

        Ok(Self {
            level: None,
            format,
            file,
        })
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self
    {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self
    {
        self.format = format;
        self
    }

    /// Priority: explicit level, then `RUST_LOG`, then `warn`.
    fn env_filter(&self) -> EnvFilter
    {
        if let Some(level) = self.level {
            return EnvFilter::new(Level::from(level).to_string());
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    }
}

/// Keeps the background file writer alive.
///
/// Dropping it flushes and stops file logging; console logging is
/// unaffected.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Initialize logging from the environment
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - `SIGMINER_LOG_FORMAT` holds an unknown value
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    init_logging_from(LoggingConfig::from_env()?)
}

/// Initialize logging with explicit level and format
///
/// `SIGMINER_LOG_FILE` is still honoured.
///
/// ```rust,no_run
/// use sigminer_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// let _guard = init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if logging is already initialized.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    let file = env::var_os(FILE_ENV).map(PathBuf::from);
    let config = LoggingConfig::from_vars(None, file)?.with_level(level).with_format(format);
    init_logging_from(config)
}

/// Install a global subscriber for `config`.
///
/// ## Errors
///
/// Returns [`LoggingError::InitializationFailed`] if a global subscriber is
/// already set.
pub fn init_logging_from(config: LoggingConfig) -> Result<LoggingGuard, LoggingError>
{
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![console_layer(&config)];

    let guard = match &config.file {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file.appender());
            let layer = match config.format {
                LogFormat::Pretty => fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false) // No ANSI in files
                    .with_filter(config.env_filter())
                    .boxed(),
                LogFormat::Json => fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_filter(config.env_filter())
                    .boxed(),
            };
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    Ok(LoggingGuard { _file: guard })
}

fn console_layer(config: &LoggingConfig) -> Box<dyn Layer<Registry> + Send + Sync>
{
    match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
            .with_filter(config.env_filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(config.env_filter())
            .boxed(),
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("prod").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("debug").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_config_defaults()
    {
        let config = LoggingConfig::from_vars(None, None).unwrap();
        assert_eq!(config, LoggingConfig::default());
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file.is_none());

        let blank = LoggingConfig::from_vars(Some("  "), Some(PathBuf::new())).unwrap();
        assert_eq!(blank, LoggingConfig::default());
    }

    #[test]
    fn test_config_rejects_unknown_format()
    {
        let err = LoggingConfig::from_vars(Some("xml"), None).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFormat(_)));
    }

    #[test]
    fn test_config_file_targets()
    {
        let dir = env::temp_dir();
        let config = LoggingConfig::from_vars(Some("json"), Some(dir.clone())).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(LogFile::InDirectory(dir.clone())));

        let path = dir.join("sigminer-test-does-not-exist.log");
        let config = LoggingConfig::from_vars(None, Some(path.clone())).unwrap();
        assert_eq!(config.file, Some(LogFile::Rolling(path)));
    }

    #[test]
    fn test_explicit_level_wins()
    {
        let config = LoggingConfig::default().with_level(LogLevel::Trace);
        assert_eq!(config.level, Some(LogLevel::Trace));
        assert_eq!(config.env_filter().to_string(), "trace");
    }
}
