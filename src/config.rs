//! Service configuration from environment variables
//!
//! Loaded after `dotenv` so a local `.env` file can supply values.

use std::env;
use std::time::Duration;

use crate::logging::LogLevel;
use crate::model::FlowError;

/// Default path of the river registry.
pub const DEFAULT_RIVERS_PATH: &str = "./rivers.toml";

/// Default number of recent records handed to the trend detector.
pub const DEFAULT_TREND_WINDOW: usize = 10;

/// Default pause between upstream requests, in milliseconds.
pub const DEFAULT_POLL_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// PostgreSQL connection string; `None` allows dry runs only.
    pub database_url: Option<String>,

    /// Path to the TOML river registry.
    pub rivers_path: String,

    /// Pause between rivers during an ingestion cycle.
    pub poll_delay: Duration,

    /// Records fetched per river when computing a trend.
    pub trend_window: usize,

    pub log_level: LogLevel,

    /// Optional append-only log file.
    pub log_file: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `DATABASE_URL` (no default)
    /// - `FISHFLOW_RIVERS` (default: ./rivers.toml)
    /// - `FISHFLOW_POLL_DELAY_MS` (default: 100)
    /// - `FISHFLOW_TREND_WINDOW` (default: 10)
    /// - `FISHFLOW_LOG_LEVEL` (default: info)
    /// - `FISHFLOW_LOG_FILE` (no default)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unparseable
    /// values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            database_url: non_empty("DATABASE_URL"),

            rivers_path: non_empty("FISHFLOW_RIVERS")
                .unwrap_or_else(|| DEFAULT_RIVERS_PATH.to_string()),

            poll_delay: Duration::from_millis(
                non_empty("FISHFLOW_POLL_DELAY_MS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(DEFAULT_POLL_DELAY_MS),
            ),

            trend_window: non_empty("FISHFLOW_TREND_WINDOW")
                .and_then(|s| s.trim().parse().ok())
                .filter(|n: &usize| *n >= 2)
                .unwrap_or(DEFAULT_TREND_WINDOW),

            log_level: non_empty("FISHFLOW_LOG_LEVEL")
                .and_then(|s| LogLevel::parse(&s))
                .unwrap_or(LogLevel::Info),

            log_file: non_empty("FISHFLOW_LOG_FILE"),
        }
    }

    pub fn require_database_url(&self) -> Result<&str, FlowError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| FlowError::Config("DATABASE_URL must be set".to_string()))
    }
}

/// Pause between watch-mode cycles: at least one minute, saturating at
/// `u64::MAX` seconds instead of overflowing.
pub fn poll_interval(minutes: u64) -> Duration {
    Duration::from_secs(minutes.max(1).saturating_mul(60))
}
