//! Per-river condition summaries for display.
//!
//! Fetches the most recent window of condition records for a river, runs
//! the trend detector over it, and pairs the result with the newest
//! record's status. Formatting helpers render absent values as `N/A`.

use serde::Serialize;

use crate::condition::{trend_with, TrendRules};
use crate::db::ConditionStore;
use crate::model::{present, ConditionRecord, ConditionStatus, FlowError, FlowReading, TrendSignal};
use crate::rivers::River;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiverSummary {
    pub slug: String,
    pub name: String,
    pub region: String,
    /// Newest stored record, if the river has ever been polled.
    pub latest: Option<ConditionRecord>,
    pub trend: TrendSignal,
}

impl RiverSummary {
    pub fn status(&self) -> Option<ConditionStatus> {
        self.latest.as_ref().map(|r| r.status())
    }

    /// One aligned line for terminal output.
    pub fn line(&self) -> String {
        let status = self.status().map_or("No data", |s| s.label());
        let reading = self.latest.as_ref().map(|r| r.reading);
        format!(
            "{:<42} {:<13} {:<10} {:>12}  {:>7}",
            self.name,
            status,
            self.trend.to_string(),
            format_flow(reading.and_then(|r| r.flow)),
            format_temperature(reading.and_then(|r| r.temperature)),
        )
    }
}

/// Builds the summary for one river from its newest `window` records.
pub fn summarize<C>(
    river: &River,
    store: &mut C,
    window: usize,
    rules: &TrendRules,
) -> Result<RiverSummary, FlowError>
where
    C: ConditionStore + ?Sized,
{
    let recent = store.recent_conditions(river.id(), window)?;
    let readings: Vec<FlowReading> = recent.iter().map(|r| r.reading).collect();
    let trend = trend_with(rules, &readings);

    Ok(RiverSummary {
        slug: river.slug.clone(),
        name: river.name.clone(),
        region: river.region.clone(),
        // store returns newest first
        latest: recent.into_iter().next(),
        trend,
    })
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `"12,345 CFS"`, or `"N/A"` when absent. Zero is a real flow.
pub fn format_flow(flow: Option<f64>) -> String {
    match present(flow) {
        Some(cfs) => format!("{} CFS", group_thousands(cfs)),
        None => "N/A".to_string(),
    }
}

/// `"54.3°F"`, or `"N/A"` when absent.
pub fn format_temperature(temperature: Option<f64>) -> String {
    match present(temperature) {
        Some(f) => format!("{:.1}°F", f),
        None => "N/A".to_string(),
    }
}

/// Comma-grouped integer part, up to three trimmed decimals.
fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.3}", value.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{classify_record, StatusRules};
    use crate::db::MemoryStore;
    use crate::rivers::parse_registry;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn river() -> River {
        parse_registry(
            r#"
[[river]]
name = "Madison River"
usgs_station_id = "06038500"
region = "Southwest Montana"
optimal_flow_min = 700.0
optimal_flow_max = 1200.0
"#,
        )
        .unwrap()
        .rivers
        .remove(0)
    }

    fn store_with(river: &River, flows: &[f64]) -> MemoryStore {
        let mut store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        for (i, flow) in flows.iter().enumerate() {
            let observed = start + Duration::minutes(15 * i as i64);
            let reading = FlowReading::with_flow(Some(*flow), observed);
            let record = classify_record(
                river.id(),
                reading,
                river.optimal_range(),
                as_of,
                &StatusRules::default(),
            );
            store.insert_condition(&record).unwrap();
        }
        store
    }

    #[test]
    fn test_summary_pairs_latest_status_with_trend() {
        let river = river();
        // oldest → newest
        let mut store = store_with(&river, &[800.0, 900.0, 1_300.0]);
        let summary = summarize(&river, &mut store, 10, &TrendRules::default()).unwrap();

        assert_eq!(summary.slug, "madison-river");
        assert_eq!(summary.status(), Some(ConditionStatus::Elevated));
        assert_eq!(summary.latest.as_ref().unwrap().reading.flow, Some(1_300.0));
        assert_eq!(summary.trend, TrendSignal::Rising);
    }

    #[test]
    fn test_summary_window_limits_records_considered() {
        let river = river();
        let mut store = store_with(&river, &[100.0, 1_000.0, 1_010.0]);
        let summary = summarize(&river, &mut store, 2, &TrendRules::default()).unwrap();
        assert_eq!(summary.trend, TrendSignal::Stable);
    }

    #[test]
    fn test_summary_for_unpolled_river() {
        let river = river();
        let mut store = MemoryStore::new();
        let summary = summarize(&river, &mut store, 10, &TrendRules::default()).unwrap();
        assert_eq!(summary.latest, None);
        assert_eq!(summary.status(), None);
        assert_eq!(summary.trend, TrendSignal::Stable);
        assert!(summary.line().contains("No data"));
    }

    #[test]
    fn test_summary_line_shows_label_arrow_and_values() {
        let river = river();
        let mut store = store_with(&river, &[1_000.0, 800.0]);
        let line = summarize(&river, &mut store, 10, &TrendRules::default()).unwrap().line();
        assert!(line.contains("Optimal"), "{}", line);
        assert!(line.contains("↘ falling"), "{}", line);
        assert!(line.contains("800 CFS"), "{}", line);
        assert!(line.contains("N/A"), "{}", line);
    }

    #[test]
    fn test_format_flow() {
        assert_eq!(format_flow(None), "N/A");
        assert_eq!(format_flow(Some(f64::NAN)), "N/A");
        assert_eq!(format_flow(Some(0.0)), "0 CFS");
        assert_eq!(format_flow(Some(912.0)), "912 CFS");
        assert_eq!(format_flow(Some(12_345.0)), "12,345 CFS");
        assert_eq!(format_flow(Some(1_234_567.5)), "1,234,567.5 CFS");
        assert_eq!(format_flow(Some(-1_500.0)), "-1,500 CFS");
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(None), "N/A");
        assert_eq!(format_temperature(Some(54.26)), "54.3°F");
        assert_eq!(format_temperature(Some(0.0)), "0.0°F");
    }
}
