//! Catalog snapshots on disk.
//!
//! A snapshot is either a bare JSON array of products or a saved API page
//! (`{"products": [...], "total_count": N}`). Null entries are skipped.

use async_trait::async_trait;
use impact_core::CatalogProduct;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{CatalogError, ProductLister, ProductPage};

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Products(Vec<Option<CatalogProduct>>),
    Page(ProductPage),
}

/// Products read from a JSON file.
#[derive(Debug, Clone)]
pub struct SnapshotCatalog {
    path: PathBuf,
}

impl SnapshotCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode snapshot content.
    pub fn parse(content: &[u8]) -> Result<Vec<CatalogProduct>, CatalogError> {
        let products = match serde_json::from_slice::<SnapshotDocument>(content)? {
            SnapshotDocument::Products(products) => products.into_iter().flatten().collect(),
            SnapshotDocument::Page(page) => page.products,
        };
        Ok(products)
    }
}

#[async_trait]
impl ProductLister for SnapshotCatalog {
    async fn list_all_products(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        let content = tokio::fs::read(&self.path).await?;
        let products = Self::parse(&content)?;
        tracing::info!(
            path = %self.path.display(),
            products = products.len(),
            "Loaded catalog snapshot"
        );
        Ok(products)
    }
}
