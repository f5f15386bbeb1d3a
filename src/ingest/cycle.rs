//! One ingestion pass over the river registry.
//!
//! For each river: fetch the latest gauge reading, classify it against the
//! river's optimal range, and append a new condition record. A failure for
//! one river is logged and that river is skipped until the next cycle; it
//! never aborts the pass.

use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

use crate::condition::{classify_record, StatusRules};
use crate::db::ConditionStore;
use crate::ingest::FlowSource;
use crate::logging::{self, DataSource};
use crate::model::ConditionStatus;
use crate::rivers::River;

/// A river recorded during the cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedRiver {
    pub river_id: String,
    pub river_name: String,
    pub flow: Option<f64>,
    pub temperature: Option<f64>,
    pub status: ConditionStatus,
}

/// A river left out of the cycle, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRiver {
    pub river_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleReport {
    pub processed: Vec<ProcessedRiver>,
    pub skipped: Vec<SkippedRiver>,
}

impl CycleReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped.len()
    }
}

/// Runs one cycle.
///
/// `as_of` is the local calendar date used for the winter ice rule. `delay`
/// is slept between consecutive rivers to stay under USGS rate limits.
pub fn run_cycle<S, C>(
    rivers: &[River],
    source: &S,
    store: &mut C,
    rules: &StatusRules,
    as_of: NaiveDate,
    delay: Duration,
) -> CycleReport
where
    S: FlowSource + ?Sized,
    C: ConditionStore + ?Sized,
{
    logging::info(
        DataSource::System,
        None,
        &format!("Fetching data for {} rivers", rivers.len()),
    );

    let mut report = CycleReport::default();

    for (i, river) in rivers.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }

        let reading = match source.fetch_latest(&river.usgs_station_id) {
            Ok(reading) => reading,
            Err(e) => {
                logging::log_failure(DataSource::Usgs, river.id(), "fetch", &e);
                report.skipped.push(SkippedRiver {
                    river_id: river.id().to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let record = classify_record(river.id(), reading, river.optimal_range(), as_of, rules);

        if let Err(e) = store.insert_condition(&record) {
            logging::log_failure(DataSource::Database, river.id(), "insert", &e);
            report.skipped.push(SkippedRiver {
                river_id: river.id().to_string(),
                reason: e.to_string(),
            });
            continue;
        }

        logging::debug(
            DataSource::Classifier,
            Some(river.id()),
            &format!("flow={:?} status={}", record.reading.flow, record.status().as_str()),
        );

        report.processed.push(ProcessedRiver {
            river_id: river.id().to_string(),
            river_name: river.name.clone(),
            flow: record.reading.flow,
            temperature: record.reading.temperature,
            status: record.status(),
        });
    }

    logging::log_cycle_summary(report.total(), report.processed.len(), report.skipped.len());
    report
}
