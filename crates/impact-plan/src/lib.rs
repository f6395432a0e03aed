//! Terraform plan decoding.
//!
//! Reads the JSON produced by `terraform show -json <planfile>` and turns
//! its `resource_changes` into [`ResourceChange`]s. Only the parts the
//! estimator needs are decoded; everything else in the document is ignored.
//!
//! Plan variables named `zone` and `region` (string values only) become
//! the default locality of every change.

pub mod error;

use impact_core::{AttrValue, Attributes, ChangeAction, ResourceChange};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub use error::PlanError;

/// Largest plan document accepted, in bytes (50 MiB).
pub const MAX_PLAN_FILE_BYTES: u64 = 50 << 20;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlanDocument {
    #[serde(default)]
    variables: Option<BTreeMap<String, Option<PlanVariable>>>,
    #[serde(default)]
    resource_changes: Option<Vec<Option<PlanResourceChange>>>,
}

#[derive(Debug, Deserialize)]
struct PlanVariable {
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct PlanResourceChange {
    #[serde(default)]
    address: String,
    #[serde(default, rename = "type")]
    resource_type: String,
    #[serde(default)]
    change: Option<PlanChange>,
}

#[derive(Debug, Deserialize)]
struct PlanChange {
    #[serde(default)]
    actions: Vec<String>,
    #[serde(default)]
    before: Value,
    #[serde(default)]
    after: Value,
}

impl PlanDocument {
    fn variable_string(&self, key: &str) -> Option<String> {
        let value = self.variables.as_ref()?.get(key)?.as_ref()?.value.as_str()?;
        (!value.is_empty()).then(|| value.to_string())
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode the plan file at `path`.
///
/// The file size is checked before the file is read.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<ResourceChange>, PlanError> {
    let path = path.as_ref();
    let size = std::fs::metadata(path)?.len();
    if size > MAX_PLAN_FILE_BYTES {
        return Err(PlanError::TooLarge {
            size,
            max: MAX_PLAN_FILE_BYTES,
        });
    }

    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "Read plan file");
    parse_bytes(&data)
}

/// Decode a plan document held in memory.
pub fn parse_bytes(data: &[u8]) -> Result<Vec<ResourceChange>, PlanError> {
    let size = data.len() as u64;
    if size > MAX_PLAN_FILE_BYTES {
        return Err(PlanError::TooLarge {
            size,
            max: MAX_PLAN_FILE_BYTES,
        });
    }

    let document: PlanDocument = serde_json::from_slice(data)?;
    Ok(decode(document))
}

pub fn parse_str(data: &str) -> Result<Vec<ResourceChange>, PlanError> {
    parse_bytes(data.as_bytes())
}

fn decode(document: PlanDocument) -> Vec<ResourceChange> {
    let zone = document.variable_string("zone");
    let region = document.variable_string("region");

    let changes: Vec<ResourceChange> = document
        .resource_changes
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|rc| {
            let (actions, before, after) = match rc.change {
                Some(change) => (
                    change
                        .actions
                        .iter()
                        .filter_map(|a| ChangeAction::from_terraform(a))
                        .collect(),
                    attributes(&change.before),
                    attributes(&change.after),
                ),
                None => (Vec::new(), Attributes::new(), Attributes::new()),
            };

            ResourceChange {
                address: rc.address,
                resource_type: rc.resource_type,
                actions,
                before,
                after,
                zone: zone.clone(),
                region: region.clone(),
            }
        })
        .collect();

    tracing::debug!(
        changes = changes.len(),
        zone = zone.as_deref().unwrap_or(""),
        region = region.as_deref().unwrap_or(""),
        "Decoded plan"
    );
    changes
}

/// Scalar attributes of a before/after state. Non-object states are empty;
/// nested values are dropped.
fn attributes(state: &Value) -> Attributes {
    let Value::Object(map) = state else {
        return Attributes::new();
    };

    map.iter()
        .filter_map(|(key, value)| AttrValue::from_json(value).map(|v| (key.clone(), v)))
        .collect()
}
