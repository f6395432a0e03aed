//! Measured environmental footprint.
//!
//! Where `impact plan` estimates what a change will cost, this crate asks
//! the authenticated footprint API what an organization actually consumed
//! over a period. [`FootprintClient`] is the HTTP implementation of
//! [`ImpactDataSource`].

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::FootprintClient;
pub use error::FootprintError;
pub use types::{
    Impact, ImpactData, ImpactQuery, ProductCategory, ProjectImpact, RegionImpact, ServiceCategory,
    SkuImpact, ZoneImpact,
};

/// Answers impact data queries.
#[async_trait]
pub trait ImpactDataSource: Send + Sync {
    async fn query_impact_data(&self, query: &ImpactQuery) -> Result<ImpactData, FootprintError>;
}
