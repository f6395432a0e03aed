//! Shared types for the impact workspace.
//!
//! The data model here is what flows between the plan decoder, the catalog
//! sources and the estimation engine:
//!
//! - [`ResourceChange`]: one planned mutation of one resource
//! - [`CatalogProduct`]: one rated SKU from the product catalog
//! - [`ImpactConfig`]: settings loaded from `impact.yaml` / `impact.toml`

// Catalog product types (SKU, locality, unit of measure, footprint rates)
pub mod catalog;

// Configuration types shared by the CLI and the catalog client
pub mod config;

// Planned resource changes and their attribute values
pub mod plan;

pub use catalog::{CatalogProduct, EnvironmentalEstimation, Locality, MeasureUnit, UnitOfMeasure};
pub use config::{
    CatalogConfig, ConfigError, Credentials, DefaultsConfig, ImpactConfig, LoggingConfig, OutputConfig,
    OutputFormat, SortKey, parse_api_base_url,
};
pub use plan::{AttrValue, Attributes, ChangeAction, ResourceChange};
