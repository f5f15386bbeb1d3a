//! River registry for the condition service.
//!
//! Defines the rivers tracked by this service, the USGS gauge each one is
//! read from, and its configured optimal flow band. The registry is loaded
//! from a TOML file (`rivers.toml` by default) and is the single source of
//! truth for river slugs; condition records reference rivers by slug.
//!
//! The same file may carry a `[classification]` table overriding the
//! status/trend rule constants.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::condition::ClassificationRules;
use crate::model::{FlowError, OptimalRange};

// ---------------------------------------------------------------------------
// River metadata
// ---------------------------------------------------------------------------

/// Fish species a river is known for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Trout,
    Salmon,
    Bass,
    Pike,
    Shad,
    Other,
}

/// Metadata for a single tracked river.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct River {
    pub name: String,
    /// URL-safe identifier; generated from `name` when left blank.
    #[serde(default)]
    pub slug: String,
    /// USGS site number of the gauge that represents this river.
    pub usgs_station_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Lower edge of the ideal flow band, CFS.
    pub optimal_flow_min: Option<f64>,
    /// Upper edge of the ideal flow band, CFS.
    pub optimal_flow_max: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub species: Vec<Species>,
}

impl River {
    /// Identifier used as `river_id` on condition records.
    pub fn id(&self) -> &str {
        &self.slug
    }

    pub fn optimal_range(&self) -> OptimalRange {
        OptimalRange {
            min: self.optimal_flow_min,
            max: self.optimal_flow_max,
        }
    }
}

/// Parsed contents of a registry file.
#[derive(Debug, Clone, Default)]
pub struct RiverRegistry {
    pub rivers: Vec<River>,
    pub rules: ClassificationRules,
}

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    classification: ClassificationRules,
    #[serde(default, rename = "river")]
    rivers: Vec<River>,
}

impl RiverRegistry {
    /// Looks up a river by slug. Returns `None` if not found.
    pub fn find(&self, slug: &str) -> Option<&River> {
        self.rivers.iter().find(|r| r.slug == slug)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Reads and validates a registry file.
pub fn load_rivers(path: impl AsRef<Path>) -> Result<RiverRegistry, FlowError> {
    let path = path.as_ref();
    load_rivers_if_present(path)?.ok_or_else(|| {
        FlowError::Config(format!("river registry {} not found", path.display()))
    })
}

/// Like `load_rivers`, but a file that does not exist yields `Ok(None)`.
///
/// Any other failure (unreadable file, bad TOML, invalid overrides) is still
/// an error.
pub fn load_rivers_if_present(
    path: impl AsRef<Path>,
) -> Result<Option<RiverRegistry>, FlowError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(text) => parse_registry(&text).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FlowError::Config(format!(
            "cannot read river registry {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Parses registry TOML, fills in missing slugs, and validates the result.
pub fn parse_registry(text: &str) -> Result<RiverRegistry, FlowError> {
    let file: RegistryFile = toml::from_str(text)
        .map_err(|e| FlowError::Config(format!("invalid river registry: {}", e)))?;

    let mut rivers = file.rivers;
    for river in &mut rivers {
        if river.slug.trim().is_empty() {
            river.slug = slugify(&river.name);
        }
    }
    validate(&rivers)?;
    file.classification.validate()?;

    Ok(RiverRegistry {
        rivers,
        rules: file.classification,
    })
}

/// Lowercases `name` and collapses every run of characters outside
/// `[a-z0-9]` into a single `-`, trimming dashes at either end.
///
/// "Madison River (below Hebgen)" → "madison-river-below-hebgen"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn validate(rivers: &[River]) -> Result<(), FlowError> {
    let mut seen = HashSet::new();
    for river in rivers {
        if river.slug.is_empty() {
            return Err(FlowError::Config(format!(
                "river '{}' has no usable slug",
                river.name
            )));
        }
        if !seen.insert(river.slug.as_str()) {
            return Err(FlowError::Config(format!(
                "duplicate river slug '{}'",
                river.slug
            )));
        }
        // USGS site numbers are 8-15 digits.
        let id = &river.usgs_station_id;
        if !(8..=15).contains(&id.len()) || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(FlowError::Config(format!(
                "river '{}' has invalid USGS station id '{}'",
                river.slug, id
            )));
        }
        if let (Some(min), Some(max)) = (river.optimal_flow_min, river.optimal_flow_max) {
            if min > max {
                return Err(FlowError::Config(format!(
                    "river '{}' has optimal_flow_min {} above optimal_flow_max {}",
                    river.slug, min, max
                )));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
