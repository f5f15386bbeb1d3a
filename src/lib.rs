//! fishflow_service: river flow conditions for anglers.
//!
//! # Module structure
//!
//! ```text
//! fishflow_service
//! ├── model         shared data types (FlowReading, ConditionStatus, FlowError, …)
//! ├── condition
//! │   ├── status    flow + optimal range + date → fishing condition
//! │   └── trend     recent readings → rising / falling / stable
//! ├── rivers        TOML river registry: gauges, optimal ranges, rule overrides
//! ├── ingest
//! │   ├── usgs      USGS NWIS IV API: URL construction + JSON parsing + client
//! │   ├── cycle     one polling pass: fetch → classify → store
//! │   └── fixtures      (test only) representative API response payloads
//! ├── db            append-only condition storage (PostgreSQL, in-memory)
//! ├── summary       latest status + trend per river, display formatting
//! ├── config        environment configuration
//! └── logging       tracing setup and failure classification
//! ```

pub mod condition;
pub mod config;
pub mod db;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod rivers;
pub mod summary;
