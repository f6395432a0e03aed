//! Planned resource changes.
//!
//! A [`ResourceChange`] is the engine's view of one entry of a Terraform
//! plan: the resource address and type, the planned actions, and the
//! scalar attributes before and after the change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name to scalar value. Ordered so iteration never depends on
/// hashing.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A scalar attribute value as found in a plan document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl AttrValue {
    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Convert a JSON value into a scalar attribute.
    ///
    /// Arrays and objects have no scalar form and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(AttrValue::Null),
            serde_json::Value::Bool(b) => Some(AttrValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(AttrValue::Number),
            serde_json::Value::String(s) => Some(AttrValue::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// Planned lifecycle action on a resource.
///
/// A replace is expressed as `Delete` + `Create` on the same change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Delete,
    Update,
}

impl ChangeAction {
    /// Parse a Terraform action name. Actions without footprint meaning
    /// (`no-op`, `read`) yield `None`.
    pub fn from_terraform(action: &str) -> Option<Self> {
        match action {
            "create" => Some(ChangeAction::Create),
            "delete" => Some(ChangeAction::Delete),
            "update" => Some(ChangeAction::Update),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "create",
            ChangeAction::Delete => "delete",
            ChangeAction::Update => "update",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned mutation of one resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Unique address, e.g. `scaleway_instance_server.web`.
    pub address: String,

    /// Resource type tag, e.g. `scaleway_instance_server`.
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default)]
    pub actions: Vec<ChangeAction>,

    #[serde(default)]
    pub before: Attributes,

    #[serde(default)]
    pub after: Attributes,

    /// Plan-level default zone, used when the attributes carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    /// Plan-level default region, used when the attributes carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ResourceChange {
    pub fn has_action(&self, action: ChangeAction) -> bool {
        self.actions.contains(&action)
    }

    /// The attribute set rules read from: `after` when non-empty,
    /// otherwise `before`.
    pub fn attributes(&self) -> &Attributes {
        if self.after.is_empty() {
            &self.before
        } else {
            &self.after
        }
    }

    /// Trimmed string attribute. Missing, null, non-string and blank
    /// values are all `None`.
    pub fn string_attr(&self, key: &str) -> Option<&str> {
        self.attributes()
            .get(key)
            .and_then(AttrValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Numeric attribute, or `fallback` when missing or not a number.
    pub fn number_attr(&self, key: &str, fallback: f64) -> f64 {
        self.attributes()
            .get(key)
            .and_then(AttrValue::as_f64)
            .unwrap_or(fallback)
    }

    /// Zone from the attributes, falling back to the plan default.
    pub fn effective_zone(&self) -> Option<&str> {
        self.string_attr("zone").or_else(|| non_blank(self.zone.as_deref()))
    }

    /// Region from the attributes, falling back to the plan default.
    pub fn effective_region(&self) -> Option<&str> {
        self.string_attr("region")
            .or_else(|| non_blank(self.region.as_deref()))
    }

    /// A copy of this change carrying only the `before` attributes.
    pub fn before_view(&self) -> Self {
        Self {
            after: Attributes::new(),
            ..self.clone()
        }
    }

    /// A copy of this change carrying only the `after` attributes.
    pub fn after_view(&self) -> Self {
        Self {
            before: Attributes::new(),
            ..self.clone()
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
