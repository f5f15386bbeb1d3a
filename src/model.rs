//! Core data types for the river condition service.
//!
//! This module defines the shared domain model imported by all other modules:
//! readings, optimal ranges, the derived status/trend vocabularies, the
//! persisted condition record, and the crate error type. It contains no
//! classification logic and no I/O.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Parameter codes
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

/// USGS parameter code for gage height (stage), in feet.
pub const PARAM_STAGE: &str = "00065";

/// USGS parameter code for water temperature, in degrees Celsius.
pub const PARAM_WATER_TEMP: &str = "00010";

/// Value USGS reports in place of a measurement when a sensor is offline.
pub const USGS_NO_DATA_SENTINEL: f64 = -999999.0;

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// One sampled gauge observation for a river.
///
/// Any measurement may be absent. `None` and `NaN` both count as absent;
/// `0.0` is a real measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowReading {
    pub flow: Option<f64>,        // CFS
    pub temperature: Option<f64>, // °F
    pub gage_height: Option<f64>, // ft
    pub timestamp: DateTime<Utc>,
}

impl FlowReading {
    /// A reading carrying only a flow value.
    pub fn with_flow(flow: Option<f64>, timestamp: DateTime<Utc>) -> Self {
        Self {
            flow,
            temperature: None,
            gage_height: None,
            timestamp,
        }
    }
}

/// Normalizes a possibly-`NaN` measurement into an `Option`.
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// Per-river configured flow band, in CFS.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OptimalRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl OptimalRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// True when both ends of the band are present.
    pub fn is_configured(&self) -> bool {
        present(self.min).is_some() && present(self.max).is_some()
    }
}

// ---------------------------------------------------------------------------
// Derived classifications
// ---------------------------------------------------------------------------

/// Fishing condition of a river, derived from a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionStatus {
    Optimal,
    Elevated,
    High,
    Low,
    IceAffected,
}

impl ConditionStatus {
    pub const ALL: [ConditionStatus; 5] = [
        ConditionStatus::Optimal,
        ConditionStatus::Elevated,
        ConditionStatus::High,
        ConditionStatus::Low,
        ConditionStatus::IceAffected,
    ];

    /// Storage / wire name, e.g. `"ice_affected"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::Optimal => "optimal",
            ConditionStatus::Elevated => "elevated",
            ConditionStatus::High => "high",
            ConditionStatus::Low => "low",
            ConditionStatus::IceAffected => "ice_affected",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ConditionStatus::Optimal => "Optimal",
            ConditionStatus::Elevated => "Elevated",
            ConditionStatus::High => "High",
            ConditionStatus::Low => "Low",
            ConditionStatus::IceAffected => "Ice Affected",
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConditionStatus {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConditionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| FlowError::ParseError(format!("unknown condition status '{}'", s)))
    }
}

/// Direction of flow change between the two freshest readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    Rising,
    Falling,
    Stable,
}

impl TrendSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendSignal::Rising => "rising",
            TrendSignal::Falling => "falling",
            TrendSignal::Stable => "stable",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TrendSignal::Rising => "↗",
            TrendSignal::Falling => "↘",
            TrendSignal::Stable => "→",
        }
    }
}

impl fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.arrow(), self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// An immutable condition row: one classified reading for one river.
///
/// Built by `condition::status::classify_record`; the status is never set
/// directly outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionRecord {
    pub river_id: String,
    pub reading: FlowReading,
    pub(crate) status: ConditionStatus,
}

impl ConditionRecord {
    pub fn status(&self) -> ConditionStatus {
        self.status
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from the collaborators around the classification core: fetching
/// and parsing USGS data, storage, and configuration. The classifier and
/// trend detector themselves never fail.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Non-2xx HTTP response from the USGS API.
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A response body or stored value could not be interpreted.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The response contained no time series for the site.
    #[error("No data available for site: {0}")]
    NoDataAvailable(String),

    #[error("Database error: {0}")]
    Database(#[from] postgres::Error),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
