//! Fishing condition classification.
//!
//! Maps a single flow measurement, the river's optimal range, and a calendar
//! date to a `ConditionStatus`. Rules are evaluated in precedence order and
//! the first match wins:
//!
//! 1. flow, min, or max absent            → `Low`
//! 2. winter month and flow < min × 0.5   → `IceAffected`
//! 3. min ≤ flow ≤ max                    → `Optimal`
//! 4. max < flow ≤ max × 1.5              → `Elevated`
//! 5. flow > max × 1.5                    → `High`
//! 6. anything else (flow < min)          → `Low`
//!
//! # Date injection
//! The winter rule needs a calendar month. Every function takes `as_of`
//! instead of reading the system clock, so all twelve months can be
//! exercised deterministically in tests.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{
    present, ConditionRecord, ConditionStatus, FlowError, FlowReading, OptimalRange,
};

// ---------------------------------------------------------------------------
// Rule constants
// ---------------------------------------------------------------------------

/// Below `optimal_min × ICE_FLOW_FACTOR` in winter, low flow is attributed to ice.
pub const ICE_FLOW_FACTOR: f64 = 0.5;

/// Calendar months (1-based) in which the ice rule applies: Dec, Jan, Feb.
pub const WINTER_MONTHS: [u32; 3] = [12, 1, 2];

/// Upper edge of the elevated band, as a multiple of `optimal_max`.
pub const ELEVATED_FLOW_FACTOR: f64 = 1.5;

/// Tunable classification constants. `Default` yields the constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRules {
    pub ice_flow_factor: f64,
    pub winter_months: Vec<u32>,
    pub elevated_flow_factor: f64,
}

impl Default for StatusRules {
    fn default() -> Self {
        Self {
            ice_flow_factor: ICE_FLOW_FACTOR,
            winter_months: WINTER_MONTHS.to_vec(),
            elevated_flow_factor: ELEVATED_FLOW_FACTOR,
        }
    }
}

impl StatusRules {
    pub fn is_winter(&self, as_of: NaiveDate) -> bool {
        self.winter_months.contains(&as_of.month())
    }

    /// Rejects overrides that would change the meaning of the bands rather
    /// than just move them.
    ///
    /// The elevated band must sit above the optimal band, so its factor is at
    /// least 1. An empty `winter_months` is allowed and turns the ice rule off.
    pub fn validate(&self) -> Result<(), FlowError> {
        if !self.ice_flow_factor.is_finite() || self.ice_flow_factor <= 0.0 {
            return Err(FlowError::Config(format!(
                "ice_flow_factor must be a positive number, got {}",
                self.ice_flow_factor
            )));
        }
        if !self.elevated_flow_factor.is_finite() || self.elevated_flow_factor < 1.0 {
            return Err(FlowError::Config(format!(
                "elevated_flow_factor must be at least 1, got {}",
                self.elevated_flow_factor
            )));
        }
        if let Some(month) = self.winter_months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(FlowError::Config(format!(
                "winter_months entries must be 1-12, got {}",
                month
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies a flow value with the default rules.
pub fn classify(
    flow: Option<f64>,
    optimal_min: Option<f64>,
    optimal_max: Option<f64>,
    as_of: NaiveDate,
) -> ConditionStatus {
    classify_with(&StatusRules::default(), flow, optimal_min, optimal_max, as_of)
}

/// Classifies a flow value against an optimal band.
///
/// Never fails: missing or `NaN` inputs classify as `Low`. Negative flows are
/// not rejected and fall through the ordinary comparisons.
pub fn classify_with(
    rules: &StatusRules,
    flow: Option<f64>,
    optimal_min: Option<f64>,
    optimal_max: Option<f64>,
    as_of: NaiveDate,
) -> ConditionStatus {
    let (Some(flow), Some(min), Some(max)) =
        (present(flow), present(optimal_min), present(optimal_max))
    else {
        return ConditionStatus::Low;
    };

    if rules.is_winter(as_of) && flow < min * rules.ice_flow_factor {
        return ConditionStatus::IceAffected;
    }

    let elevated_ceiling = max * rules.elevated_flow_factor;
    if flow >= min && flow <= max {
        ConditionStatus::Optimal
    } else if flow > max && flow <= elevated_ceiling {
        ConditionStatus::Elevated
    } else if flow > elevated_ceiling {
        ConditionStatus::High
    } else {
        ConditionStatus::Low
    }
}

/// Classifies a reading for a river and wraps it as a new condition record.
///
/// This is the only way to obtain a freshly classified `ConditionRecord`.
pub fn classify_record(
    river_id: &str,
    reading: FlowReading,
    range: OptimalRange,
    as_of: NaiveDate,
    rules: &StatusRules,
) -> ConditionRecord {
    let status = classify_with(rules, reading.flow, range.min, range.max, as_of);
    ConditionRecord {
        river_id: river_id.to_string(),
        reading,
        status,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const MIN: f64 = 100.0;
    const MAX: f64 = 500.0;

    fn date(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, 15).unwrap()
    }

    fn july() -> NaiveDate {
        date(7)
    }

    fn january() -> NaiveDate {
        date(1)
    }

    fn at(flow: f64, when: NaiveDate) -> ConditionStatus {
        classify(Some(flow), Some(MIN), Some(MAX), when)
    }

    // --- Missing data -------------------------------------------------------

    #[test]
    fn test_missing_flow_is_low() {
        assert_eq!(classify(None, Some(MIN), Some(MAX), july()), ConditionStatus::Low);
    }

    #[test]
    fn test_missing_range_end_is_low() {
        assert_eq!(classify(Some(300.0), None, Some(MAX), july()), ConditionStatus::Low);
        assert_eq!(classify(Some(300.0), Some(MIN), None, july()), ConditionStatus::Low);
    }

    #[test]
    fn test_missing_data_is_low_even_in_winter() {
        assert_eq!(classify(None, Some(MIN), Some(MAX), january()), ConditionStatus::Low);
    }

    #[test]
    fn test_nan_inputs_count_as_missing() {
        assert_eq!(
            classify(Some(f64::NAN), Some(MIN), Some(MAX), july()),
            ConditionStatus::Low
        );
        assert_eq!(
            classify(Some(300.0), Some(f64::NAN), Some(MAX), july()),
            ConditionStatus::Low
        );
    }

    // --- Optimal band -------------------------------------------------------

    #[test]
    fn test_flow_inside_band_is_optimal() {
        assert_eq!(at(300.0, july()), ConditionStatus::Optimal);
    }

    #[test]
    fn test_band_is_inclusive_at_both_ends() {
        assert_eq!(at(MIN, july()), ConditionStatus::Optimal);
        assert_eq!(at(MAX, july()), ConditionStatus::Optimal);
    }

    #[test]
    fn test_degenerate_band_point_is_optimal() {
        assert_eq!(
            classify(Some(250.0), Some(250.0), Some(250.0), july()),
            ConditionStatus::Optimal
        );
        assert_eq!(
            classify(Some(250.01), Some(250.0), Some(250.0), july()),
            ConditionStatus::Elevated
        );
    }

    // --- Above the band -----------------------------------------------------

    #[test]
    fn test_just_above_max_is_elevated() {
        assert_eq!(at(MAX + 0.01, july()), ConditionStatus::Elevated);
    }

    #[test]
    fn test_exactly_one_and_a_half_max_is_still_elevated() {
        assert_eq!(at(MAX * 1.5, july()), ConditionStatus::Elevated);
    }

    #[test]
    fn test_past_one_and_a_half_max_is_high() {
        assert_eq!(at(MAX * 1.5 + 0.01, july()), ConditionStatus::High);
        assert_eq!(at(50_000.0, july()), ConditionStatus::High);
    }

    // --- Below the band -----------------------------------------------------

    #[test]
    fn test_below_min_in_summer_is_low() {
        assert_eq!(at(MIN - 0.01, july()), ConditionStatus::Low);
        assert_eq!(at(10.0, july()), ConditionStatus::Low);
    }

    #[test]
    fn test_zero_flow_is_classified_not_treated_as_missing() {
        assert_eq!(at(0.0, july()), ConditionStatus::Low);
        assert_eq!(at(0.0, january()), ConditionStatus::IceAffected);
    }

    #[test]
    fn test_negative_flow_falls_through_comparisons() {
        assert_eq!(at(-20.0, july()), ConditionStatus::Low);
        assert_eq!(at(-20.0, date(2)), ConditionStatus::IceAffected);
    }

    // --- Winter override ----------------------------------------------------

    #[test]
    fn test_same_flow_differs_between_january_and_july() {
        let flow = MIN * 0.5 - 0.01;
        assert_eq!(at(flow, january()), ConditionStatus::IceAffected);
        assert_eq!(at(flow, july()), ConditionStatus::Low);
    }

    #[test]
    fn test_ice_threshold_is_strictly_below_half_min() {
        // Exactly half of min is not ice; it is an ordinary low.
        assert_eq!(at(MIN * 0.5, january()), ConditionStatus::Low);
    }

    #[test]
    fn test_ice_rule_applies_only_in_dec_jan_feb() {
        let flow = 10.0;
        for month in 1..=12 {
            let expected = if matches!(month, 12 | 1 | 2) {
                ConditionStatus::IceAffected
            } else {
                ConditionStatus::Low
            };
            assert_eq!(at(flow, date(month)), expected, "month {}", month);
        }
    }

    #[test]
    fn test_winter_does_not_change_in_band_or_high_results() {
        assert_eq!(at(300.0, date(12)), ConditionStatus::Optimal);
        assert_eq!(at(900.0, date(2)), ConditionStatus::High);
    }

    // --- Properties ---------------------------------------------------------

    #[test]
    fn test_classification_is_idempotent() {
        for flow in [0.0, 49.0, 100.0, 320.5, 500.0, 750.0, 750.01, 9_999.0] {
            for when in [january(), july()] {
                assert_eq!(at(flow, when), at(flow, when));
            }
        }
    }

    #[test]
    fn test_every_in_band_flow_is_optimal_outside_ice_conditions() {
        let mut flow = MIN;
        while flow <= MAX {
            assert_eq!(at(flow, july()), ConditionStatus::Optimal, "flow {}", flow);
            flow += 12.5;
        }
    }

    #[test]
    fn test_custom_rules_change_thresholds() {
        let rules = StatusRules {
            ice_flow_factor: 0.25,
            winter_months: vec![3],
            elevated_flow_factor: 2.0,
        };
        let with = |flow: f64, when| classify_with(&rules, Some(flow), Some(MIN), Some(MAX), when);
        assert_eq!(with(20.0, date(3)), ConditionStatus::IceAffected);
        assert_eq!(with(30.0, date(3)), ConditionStatus::Low);
        assert_eq!(with(20.0, january()), ConditionStatus::Low);
        assert_eq!(with(1_000.0, july()), ConditionStatus::Elevated);
    }

    #[test]
    fn test_default_rules_match_constants() {
        let rules = StatusRules::default();
        assert_eq!(rules.ice_flow_factor, 0.5);
        assert_eq!(rules.winter_months, vec![12, 1, 2]);
        assert_eq!(rules.elevated_flow_factor, 1.5);
    }

    // --- Records ------------------------------------------------------------

    #[test]
    fn test_classify_record_carries_reading_through_untouched() {
        let reading = FlowReading {
            flow: Some(640.0),
            temperature: Some(51.8),
            gage_height: Some(3.2),
            timestamp: Utc.with_ymd_and_hms(2024, 7, 15, 17, 0, 0).unwrap(),
        };
        let record = classify_record(
            "au-sable",
            reading,
            OptimalRange::new(MIN, MAX),
            july(),
            &StatusRules::default(),
        );
        assert_eq!(record.river_id, "au-sable");
        assert_eq!(record.reading, reading);
        assert_eq!(record.status(), ConditionStatus::Elevated);
    }

    #[test]
    fn test_temperature_and_stage_do_not_affect_status() {
        let when = Utc.with_ymd_and_hms(2024, 7, 15, 17, 0, 0).unwrap();
        let cold = FlowReading {
            flow: Some(300.0),
            temperature: Some(33.0),
            gage_height: Some(0.1),
            timestamp: when,
        };
        let warm = FlowReading {
            temperature: Some(78.0),
            gage_height: Some(9.9),
            ..cold
        };
        let range = OptimalRange::new(MIN, MAX);
        let rules = StatusRules::default();
        assert_eq!(
            classify_record("r", cold, range, july(), &rules).status(),
            classify_record("r", warm, range, july(), &rules).status()
        );
    }

    // --- Rule validation ----------------------------------------------------

    #[test]
    fn test_default_rules_are_valid() {
        assert!(StatusRules::default().validate().is_ok());
    }

    #[test]
    fn test_elevated_factor_below_one_is_invalid() {
        let rules = StatusRules {
            elevated_flow_factor: 0.5,
            ..StatusRules::default()
        };
        assert!(matches!(rules.validate(), Err(FlowError::Config(_))));
    }

    #[test]
    fn test_month_thirteen_is_invalid() {
        let rules = StatusRules {
            winter_months: vec![12, 13],
            ..StatusRules::default()
        };
        let err = rules.validate().unwrap_err();
        assert!(err.to_string().contains("13"), "{}", err);
    }
}
