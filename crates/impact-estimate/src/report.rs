//! Estimation report types.
//!
//! Unknown metrics are `None` in memory. On the wire each metric is a
//! value plus a `*_known` flag (value 0 when unknown), which is the shape
//! `schemas/Report.schema.json` describes.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// One line of computed monthly impact.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub address: String,
    pub resource_type: String,
    /// Transition label: `create`, `delete` or `update`.
    pub action: String,
    pub sku: String,
    /// Signed kgCO2e per month; `None` when the catalog has no rate.
    pub kg_co2e_month: Option<f64>,
    /// Signed m3 of water per month; `None` when the catalog has no rate.
    pub m3_water_month: Option<f64>,
}

impl Row {
    pub fn kg_co2e_known(&self) -> bool {
        self.kg_co2e_month.is_some()
    }

    pub fn m3_water_known(&self) -> bool {
        self.m3_water_month.is_some()
    }

    /// Whether either metric is unknown.
    pub fn is_partial(&self) -> bool {
        !self.kg_co2e_known() || !self.m3_water_known()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Row", 8)?;
        state.serialize_field("address", &self.address)?;
        state.serialize_field("type", &self.resource_type)?;
        state.serialize_field("action", &self.action)?;
        if self.sku.is_empty() {
            state.skip_field("sku")?;
        } else {
            state.serialize_field("sku", &self.sku)?;
        }
        state.serialize_field("kgco2e_month", &self.kg_co2e_month.unwrap_or(0.0))?;
        state.serialize_field("kgco2e_known", &self.kg_co2e_known())?;
        state.serialize_field("m3_water_month", &self.m3_water_month.unwrap_or(0.0))?;
        state.serialize_field("m3_water_known", &self.m3_water_known())?;
        state.end()
    }
}

/// A resource (transition) that could not be matched to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedResource {
    pub address: String,
    /// Machine-readable code, e.g. `not_implemented`.
    pub code: String,
    pub reason: String,
}

/// Aggregate impact across all rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    #[serde(rename = "kgco2e_month")]
    pub kg_co2e_month: f64,
    /// False when any row lacked a kgCO2e rate.
    #[serde(rename = "kgco2e_known")]
    pub kg_co2e_known: bool,
    pub m3_water_month: f64,
    /// False when any row lacked a water rate.
    pub m3_water_known: bool,
    /// Rows missing at least one metric.
    pub unknown_rows: usize,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            kg_co2e_month: 0.0,
            kg_co2e_known: true,
            m3_water_month: 0.0,
            m3_water_known: true,
            unknown_rows: 0,
        }
    }
}

impl Totals {
    /// Fold one row into the totals.
    pub fn add(self, row: &Row) -> Self {
        Self {
            kg_co2e_month: self.kg_co2e_month + row.kg_co2e_month.unwrap_or(0.0),
            kg_co2e_known: self.kg_co2e_known && row.kg_co2e_known(),
            m3_water_month: self.m3_water_month + row.m3_water_month.unwrap_or(0.0),
            m3_water_known: self.m3_water_known && row.m3_water_known(),
            unknown_rows: self.unknown_rows + usize::from(row.is_partial()),
        }
    }

    /// Totals over `rows`.
    pub fn from_rows<'r>(rows: impl IntoIterator<Item = &'r Row>) -> Self {
        rows.into_iter().fold(Self::default(), Self::add)
    }
}

/// Result of estimating a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<Row>,
    pub unsupported: Vec<UnsupportedResource>,
    pub totals: Totals,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.unsupported.is_empty()
    }
}
