//! Flow trend detection.
//!
//! The trend looks only at the two freshest readings in the supplied window.
//! The window is re-sorted here rather than trusting the caller's ordering,
//! and the "most recent pair" selection is its own stage so it can be
//! checked independently of the percent-change math.

use serde::{Deserialize, Serialize};

use crate::model::{present, FlowError, FlowReading, TrendSignal};

/// Percent change (either direction) that must be exceeded to report a trend.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendRules {
    pub threshold_percent: f64,
}

impl Default for TrendRules {
    fn default() -> Self {
        Self {
            threshold_percent: TREND_THRESHOLD_PERCENT,
        }
    }
}

impl TrendRules {
    /// A negative threshold would invert the dead-band.
    pub fn validate(&self) -> Result<(), FlowError> {
        if !self.threshold_percent.is_finite() || self.threshold_percent < 0.0 {
            return Err(FlowError::Config(format!(
                "threshold_percent must be a non-negative number, got {}",
                self.threshold_percent
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Returns the readings ordered by timestamp, most recent first.
///
/// Readings sharing a timestamp keep their input order.
pub fn sort_newest_first(readings: &[FlowReading]) -> Vec<&FlowReading> {
    let mut sorted: Vec<&FlowReading> = readings.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

/// Returns `(current, previous)`: the freshest reading and the one before it.
pub fn most_recent_pair(readings: &[FlowReading]) -> Option<(&FlowReading, &FlowReading)> {
    let sorted = sort_newest_first(readings);
    if sorted.len() < 2 {
        return None;
    }
    Some((sorted[0], sorted[1]))
}

/// Percent change from `previous` to `current`.
///
/// `None` when either value is absent or zero; a zero baseline has no
/// meaningful percentage.
pub fn percent_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let current = present(current)?;
    let previous = present(previous)?;
    if current == 0.0 || previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Maps a percent change onto a signal, with a dead-band around zero.
pub fn signal_for_change(change: f64, rules: &TrendRules) -> TrendSignal {
    if change > rules.threshold_percent {
        TrendSignal::Rising
    } else if change < -rules.threshold_percent {
        TrendSignal::Falling
    } else {
        TrendSignal::Stable
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Trend over a window of readings using the default dead-band.
pub fn trend(readings: &[FlowReading]) -> TrendSignal {
    trend_with(&TrendRules::default(), readings)
}

pub fn trend_with(rules: &TrendRules, readings: &[FlowReading]) -> TrendSignal {
    let Some((current, previous)) = most_recent_pair(readings) else {
        return TrendSignal::Stable;
    };
    percent_change(current.flow, previous.flow)
        .map(|change| signal_for_change(change, rules))
        .unwrap_or(TrendSignal::Stable)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
