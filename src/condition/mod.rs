//! Condition classification and trend derivation.
//!
//! Pure, synchronous functions with no shared state; safe to call from any
//! thread.
//!
//! Submodules:
//! - `status`: flow + optimal range + date → `ConditionStatus`.
//! - `trend`: window of readings → `TrendSignal`.

pub mod status;
pub mod trend;

pub use status::{classify, classify_record, classify_with, StatusRules};
pub use trend::{trend, trend_with, TrendRules};

use serde::{Deserialize, Serialize};

use crate::model::FlowError;

/// Both rule sets, as read from the `[classification]` table of the river
/// registry file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationRules {
    pub status: StatusRules,
    pub trend: TrendRules,
}

impl ClassificationRules {
    pub fn validate(&self) -> Result<(), FlowError> {
        self.status.validate()?;
        self.trend.validate()
    }
}
