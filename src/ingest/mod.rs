//! Ingestion of gauge readings.
//!
//! Submodules:
//! - `usgs`: NWIS IV API: URL construction, JSON parsing, blocking client.
//! - `cycle`: one polling pass over the registry: fetch, classify, store.
//! - `fixtures` (test only): representative API response payloads.

pub mod cycle;
pub mod usgs;

#[cfg(test)]
pub mod fixtures;

use crate::model::{FlowError, FlowReading};

/// Anything that can produce the latest reading for a gauge.
pub trait FlowSource {
    fn fetch_latest(&self, site_code: &str) -> Result<FlowReading, FlowError>;
}
