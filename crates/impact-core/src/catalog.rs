//! Product catalog types.
//!
//! Field names follow the snake_case wire format of the public product
//! catalog API so that snapshots and live responses decode the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One rated SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Unique identifier; also the deterministic tie-break key when
    /// matching.
    #[serde(default)]
    pub sku: String,

    #[serde(default)]
    pub service_category: String,

    #[serde(default)]
    pub product_category: String,

    #[serde(default)]
    pub product: String,

    #[serde(default)]
    pub variant: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub locality: Locality,

    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_of_measure: UnitOfMeasure,

    /// Per billing unit impact. `None` and absent sub-fields mean
    /// "unknown", not zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_impact_estimation: Option<EnvironmentalEstimation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_life_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,
}

impl CatalogProduct {
    pub fn kg_co2_equivalent(&self) -> Option<f64> {
        self.environmental_impact_estimation
            .as_ref()
            .and_then(|e| e.kg_co2_equivalent)
    }

    pub fn m3_water_usage(&self) -> Option<f64> {
        self.environmental_impact_estimation
            .as_ref()
            .and_then(|e| e.m3_water_usage)
    }
}

/// Geographic scope of a product: global, region-bound or zone-bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<bool>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub zone: String,
}

impl Locality {
    pub fn is_global(&self) -> bool {
        self.global.unwrap_or(false)
    }

    pub fn zone(zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            ..Default::default()
        }
    }

    pub fn region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn global() -> Self {
        Self {
            global: Some(true),
            ..Default::default()
        }
    }
}

/// Billing unit and bundle size a rate applies to (e.g. per 100 GB per
/// month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    #[serde(default)]
    pub unit: MeasureUnit,

    #[serde(default = "default_size")]
    pub size: u64,
}

impl Default for UnitOfMeasure {
    fn default() -> Self {
        Self {
            unit: MeasureUnit::default(),
            size: default_size(),
        }
    }
}

impl UnitOfMeasure {
    pub fn new(unit: MeasureUnit, size: u64) -> Self {
        Self { unit, size }
    }
}

/// Time unit of a rate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MeasureUnit {
    Hour,
    Month,
    Year,
    /// Any unit the catalog reports that has no monthly projection.
    Other(String),
    #[default]
    Unknown,
}

impl MeasureUnit {
    pub fn as_str(&self) -> &str {
        match self {
            MeasureUnit::Hour => "hour",
            MeasureUnit::Month => "month",
            MeasureUnit::Year => "year",
            MeasureUnit::Other(other) => other,
            MeasureUnit::Unknown => "unknown_unit_of_measure",
        }
    }
}

impl From<String> for MeasureUnit {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "hour" => MeasureUnit::Hour,
            "month" => MeasureUnit::Month,
            "year" => MeasureUnit::Year,
            "" | "unknown_unit_of_measure" => MeasureUnit::Unknown,
            _ => MeasureUnit::Other(value),
        }
    }
}

impl From<&str> for MeasureUnit {
    fn from(value: &str) -> Self {
        MeasureUnit::from(value.to_string())
    }
}

impl From<MeasureUnit> for String {
    fn from(value: MeasureUnit) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MeasureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per billing unit footprint rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalEstimation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kg_co2_equivalent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m3_water_usage: Option<f64>,
}

fn default_size() -> u64 {
    1
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_product_shape() {
        let json = r#"{
            "sku": "/compute/dev1_m/run_fr-par-1",
            "service_category": "Compute",
            "product_category": "Instance",
            "product": "DEV1-M",
            "variant": "",
            "description": "Development instance",
            "locality": {"zone": "fr-par-1", "region": null},
            "unit_of_measure": {"unit": "hour", "size": 1},
            "environmental_impact_estimation": {"kg_co2_equivalent": 0.0012},
            "status": "general_availability",
            "badges": ["new_product"]
        }"#;

        let product: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.locality.zone, "fr-par-1");
        assert_eq!(product.locality.region, "");
        assert!(!product.locality.is_global());
        assert_eq!(product.unit_of_measure.unit, MeasureUnit::Hour);
        assert_eq!(product.kg_co2_equivalent(), Some(0.0012));
        assert_eq!(product.m3_water_usage(), None);
    }

    #[test]
    fn unrecognized_units_are_preserved() {
        assert_eq!(MeasureUnit::from("HOUR"), MeasureUnit::Hour);
        assert_eq!(MeasureUnit::from("unknown_unit_of_measure"), MeasureUnit::Unknown);
        assert_eq!(
            MeasureUnit::from("gigabyte"),
            MeasureUnit::Other("gigabyte".to_string())
        );
        assert_eq!(MeasureUnit::from("gigabyte").as_str(), "gigabyte");
        assert_eq!(
            MeasureUnit::from("hours"),
            MeasureUnit::Other("hours".to_string())
        );
    }

    #[test]
    fn missing_unit_of_measure_defaults_to_single_unit() {
        let product: CatalogProduct = serde_json::from_str(r#"{"sku": "x"}"#).unwrap();
        assert_eq!(product.unit_of_measure.size, 1);
        assert_eq!(product.unit_of_measure.unit, MeasureUnit::Unknown);
        assert!(product.environmental_impact_estimation.is_none());
    }
}
