//! Query and response types of the impact data endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Baremetal,
    Compute,
    Storage,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 3] = [
        ServiceCategory::Baremetal,
        ServiceCategory::Compute,
        ServiceCategory::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Baremetal => "baremetal",
            ServiceCategory::Compute => "compute",
            ServiceCategory::Storage => "storage",
        }
    }
}

impl FromStr for ServiceCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = normalize_enum_token(value);
        Self::ALL
            .into_iter()
            .find(|c| normalize_enum_token(c.as_str()) == token)
            .ok_or_else(|| {
                format!("unknown service category '{value}' (allowed: baremetal, compute, storage)")
            })
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    AppleSilicon,
    BlockStorage,
    Dedibox,
    ElasticMetal,
    Instances,
    ObjectStorage,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::AppleSilicon,
        ProductCategory::BlockStorage,
        ProductCategory::Dedibox,
        ProductCategory::ElasticMetal,
        ProductCategory::Instances,
        ProductCategory::ObjectStorage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::AppleSilicon => "apple_silicon",
            ProductCategory::BlockStorage => "block_storage",
            ProductCategory::Dedibox => "dedibox",
            ProductCategory::ElasticMetal => "elastic_metal",
            ProductCategory::Instances => "instances",
            ProductCategory::ObjectStorage => "object_storage",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = normalize_enum_token(value);
        Self::ALL
            .into_iter()
            .find(|c| normalize_enum_token(c.as_str()) == token)
            .ok_or_else(|| {
                format!(
                    "unknown product category '{value}' (allowed: applesilicon, blockstorage, \
                     dedibox, elasticmetal, instances, objectstorage)"
                )
            })
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Block-Storage`, `block_storage` and `blockstorage` are the same value.
fn normalize_enum_token(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect()
}

/// Filters for one impact data query. Empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactQuery {
    pub organization_id: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub project_ids: Vec<String>,
    pub regions: Vec<String>,
    pub zones: Vec<String>,
    pub service_categories: Vec<ServiceCategory>,
    pub product_categories: Vec<ProductCategory>,
}

impl ImpactQuery {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            ..Default::default()
        }
    }

    /// Query string pairs. List filters repeat their key once per value.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("organization_id", self.organization_id.clone())];

        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        pairs.extend(self.project_ids.iter().map(|v| ("project_ids", v.clone())));
        pairs.extend(self.regions.iter().map(|v| ("regions", v.clone())));
        pairs.extend(self.zones.iter().map(|v| ("zones", v.clone())));
        pairs.extend(
            self.service_categories
                .iter()
                .map(|c| ("service_categories", c.as_str().to_string())),
        );
        pairs.extend(
            self.product_categories
                .iter()
                .map(|c| ("product_categories", c.as_str().to_string())),
        );

        pairs
    }
}

/// Measured footprint over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    #[serde(default)]
    pub kg_co2_equivalent: f64,
    #[serde(default)]
    pub m3_water_usage: f64,
}

/// Impact data for the queried period, broken down by project, region,
/// zone and SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactData {
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_impact: Impact,
    #[serde(default, deserialize_with = "skip_nulls")]
    pub projects: Vec<ProjectImpact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectImpact {
    #[serde(default)]
    pub project_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_project_impact: Impact,
    #[serde(default, deserialize_with = "skip_nulls")]
    pub regions: Vec<RegionImpact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionImpact {
    #[serde(default)]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_region_impact: Impact,
    #[serde(default, deserialize_with = "skip_nulls")]
    pub zones: Vec<ZoneImpact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneImpact {
    #[serde(default)]
    pub zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_zone_impact: Impact,
    #[serde(default, deserialize_with = "skip_nulls")]
    pub skus: Vec<SkuImpact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkuImpact {
    #[serde(default)]
    pub sku: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_sku_impact: Impact,
    #[serde(default)]
    pub service_category: String,
    #[serde(default)]
    pub product_category: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn skip_nulls<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}
