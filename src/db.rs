//! Condition record storage.
//!
//! Condition rows are append-only: the ingestion cycle inserts one new row
//! per river per run and nothing ever updates an existing row. Presentation
//! reads back the newest N rows for a river to derive its trend.
//!
//! `PgConditionStore` is the production backend (schema in
//! `sql/001_conditions.sql`); `MemoryStore` backs dry runs and tests.

use chrono::{DateTime, Utc};
use postgres::{Client, NoTls, Row};

use crate::model::{ConditionRecord, ConditionStatus, FlowError, FlowReading};

pub trait ConditionStore {
    /// Appends a new immutable record.
    fn insert_condition(&mut self, record: &ConditionRecord) -> Result<(), FlowError>;

    /// Returns up to `limit` records for the river, newest first.
    fn recent_conditions(
        &mut self,
        river_id: &str,
        limit: usize,
    ) -> Result<Vec<ConditionRecord>, FlowError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

pub struct PgConditionStore {
    client: Client,
}

impl PgConditionStore {
    pub fn connect(database_url: &str) -> Result<Self, FlowError> {
        let client = Client::connect(database_url, NoTls)?;
        Ok(Self { client })
    }

    /// Connects and checks that the `conditions` table exists, so a missing
    /// migration fails at startup rather than on the first insert.
    pub fn connect_and_verify(database_url: &str) -> Result<Self, FlowError> {
        let mut store = Self::connect(database_url)?;
        let row = store
            .client
            .query_one("SELECT to_regclass('public.conditions') IS NOT NULL", &[])?;
        let exists: bool = row.get(0);
        if !exists {
            return Err(FlowError::Config(
                "table 'conditions' not found; apply sql/001_conditions.sql".to_string(),
            ));
        }
        Ok(store)
    }
}

impl ConditionStore for PgConditionStore {
    fn insert_condition(&mut self, record: &ConditionRecord) -> Result<(), FlowError> {
        let reading = &record.reading;
        self.client.execute(
            "INSERT INTO conditions
                (river_id, timestamp, flow, temperature, gage_height, status)
             VALUES ($1, $2, $3, $4, $5, $6)",
            &[
                &record.river_id,
                &reading.timestamp,
                &reading.flow,
                &reading.temperature,
                &reading.gage_height,
                &record.status.as_str(),
            ],
        )?;
        Ok(())
    }

    fn recent_conditions(
        &mut self,
        river_id: &str,
        limit: usize,
    ) -> Result<Vec<ConditionRecord>, FlowError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self.client.query(
            "SELECT timestamp, flow, temperature, gage_height, status
             FROM conditions
             WHERE river_id = $1
             ORDER BY timestamp DESC
             LIMIT $2",
            &[&river_id, &limit],
        )?;
        rows.iter().map(|row| record_from_row(river_id, row)).collect()
    }
}

fn record_from_row(river_id: &str, row: &Row) -> Result<ConditionRecord, FlowError> {
    let status: String = row.get(4);
    Ok(ConditionRecord {
        river_id: river_id.to_string(),
        reading: FlowReading {
            timestamp: row.get::<_, DateTime<Utc>>(0),
            flow: row.get(1),
            temperature: row.get(2),
            gage_height: row.get(3),
        },
        status: status.parse::<ConditionStatus>()?,
    })
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ConditionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[ConditionRecord] {
        &self.records
    }
}

impl ConditionStore for MemoryStore {
    fn insert_condition(&mut self, record: &ConditionRecord) -> Result<(), FlowError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn recent_conditions(
        &mut self,
        river_id: &str,
        limit: usize,
    ) -> Result<Vec<ConditionRecord>, FlowError> {
        let mut matching: Vec<&ConditionRecord> = self
            .records
            .iter()
            .filter(|r| r.river_id == river_id)
            .collect();
        matching.sort_by(|a, b| b.reading.timestamp.cmp(&a.reading.timestamp));
        Ok(matching.into_iter().take(limit).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
