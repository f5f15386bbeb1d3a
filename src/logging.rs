//! Structured logging for the river condition service
//!
//! Provides context-rich logging with data-source tags and river
//! identifiers. Output goes through `tracing`; `init_logger` installs a
//! console layer on stderr and, optionally, an append-only log file for
//! scheduled/daemon runs.

use std::fmt;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter, Layer, Registry};

use crate::model::FlowError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses `debug`, `info`, `warn`/`warning`, `error` (any case).
    pub fn parse(s: &str) -> Option<LogLevel> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Usgs,
    Database,
    Classifier,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Usgs => write!(f, "USGS"),
            DataSource::Database => write!(f, "DB"),
            DataSource::Classifier => write!(f, "CLS"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - gauge offline, seasonal, or iced over
    Expected,
    /// Unexpected failure - indicates service degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Installs the global subscriber.
///
/// `RUST_LOG`, when set, overrides `min_level`. With `console_timestamps`
/// off, console lines omit the time (cron output is already timestamped).
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_logger(
    min_level: LogLevel,
    log_file: Option<&str>,
    console_timestamps: bool,
) -> Result<(), FlowError> {
    let filter = EnvFilter::builder()
        .with_default_directive(min_level.as_filter().into())
        .from_env_lossy();

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let ansi = console_ansi(
        std::io::stderr().is_terminal(),
        std::env::var("NO_COLOR").ok().as_deref(),
    );
    let console = tracing_fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false);
    if console_timestamps {
        layers.push(console.boxed());
    } else {
        layers.push(console.without_time().boxed());
    }

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        layers.push(
            tracing_fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| FlowError::Config(format!("logger already initialized: {}", e)))
}

/// Colour console output only on a terminal, and never when `NO_COLOR` is set
/// to a non-empty value.
fn console_ansi(is_terminal: bool, no_color: Option<&str>) -> bool {
    is_terminal && no_color.is_none_or(str::is_empty)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(source: DataSource, river_id: Option<&str>, message: &str) {
    tracing::info!(source = %source, river = river_id.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(source: DataSource, river_id: Option<&str>, message: &str) {
    tracing::warn!(source = %source, river = river_id.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(source: DataSource, river_id: Option<&str>, message: &str) {
    tracing::error!(source = %source, river = river_id.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(source: DataSource, river_id: Option<&str>, message: &str) {
    tracing::debug!(source = %source, river = river_id.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a fetch/store failure by its error variant.
pub fn classify_failure(err: &FlowError) -> FailureType {
    match err {
        // Empty series usually means a seasonal or offline gauge.
        FlowError::NoDataAvailable(_) => FailureType::Expected,
        // 5xx is USGS having a bad day; 4xx means we built a bad request.
        FlowError::HttpError(code) if *code >= 500 => FailureType::Unknown,
        FlowError::HttpError(_) => FailureType::Unexpected,
        FlowError::Request(_) => FailureType::Unknown,
        FlowError::ParseError(_) => FailureType::Unexpected,
        FlowError::Database(_) | FlowError::Config(_) | FlowError::Io(_) => {
            FailureType::Unexpected
        }
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a per-river failure with automatic classification.
///
/// Expected failures go to debug, unknown ones to warn, unexpected ones to
/// error.
pub fn log_failure(source: DataSource, river_id: &str, operation: &str, err: &FlowError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(source, Some(river_id), &message),
        FailureType::Unexpected => error(source, Some(river_id), &message),
        FailureType::Unknown => warn(source, Some(river_id), &message),
    }
}

// ---------------------------------------------------------------------------
// Cycle Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of an ingestion cycle
pub fn log_cycle_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Cycle complete: {}/{} rivers recorded, {} skipped",
        successful, total, failed
    );

    if failed == 0 {
        info(DataSource::System, None, &message);
    } else if successful == 0 {
        error(DataSource::System, None, &message);
    } else {
        warn(DataSource::System, None, &message);
    }
}
