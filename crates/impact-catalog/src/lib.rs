//! Product catalog sources.
//!
//! The estimator consumes a plain `Vec<CatalogProduct>`; this crate
//! produces it from one of two places:
//!
//! - [`SnapshotCatalog`]: a JSON file on disk
//! - [`CatalogClient`]: the public product catalog API, all pages
//!
//! Both implement [`ProductLister`], so callers pick the source from
//! configuration with [`from_config`] and never care which one they hold.

pub mod client;
pub mod error;
pub mod snapshot;

use async_trait::async_trait;
use impact_core::{CatalogConfig, CatalogProduct};
use serde::Deserialize;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use snapshot::SnapshotCatalog;

/// Page size used when listing every product.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Lists the whole product catalog.
#[async_trait]
pub trait ProductLister: Send + Sync {
    async fn list_all_products(&self) -> Result<Vec<CatalogProduct>, CatalogError>;
}

/// Fetches one page of the catalog.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// `page` is 1-based.
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<ProductPage, CatalogError>;
}

/// One page of the product listing, as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPage {
    #[serde(default, deserialize_with = "skip_null_products")]
    pub products: Vec<CatalogProduct>,

    /// Products across all pages. 0 when the server does not say.
    #[serde(default)]
    pub total_count: u64,
}

fn skip_null_products<'de, D>(deserializer: D) -> Result<Vec<CatalogProduct>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let products: Option<Vec<Option<CatalogProduct>>> = Option::deserialize(deserializer)?;
    Ok(products.unwrap_or_default().into_iter().flatten().collect())
}

/// Collect every page from `fetcher`.
///
/// Stops when `total_count` products have been collected, on an empty
/// page, or (when the server reports no total) on a short page.
pub async fn list_all_pages<F>(fetcher: &F, page_size: u32) -> Result<Vec<CatalogProduct>, CatalogError>
where
    F: PageFetcher + ?Sized,
{
    let page_size = page_size.max(1);
    let mut products = Vec::new();
    let mut page = 1;

    loop {
        let batch = fetcher.fetch_page(page, page_size).await?;
        let received = batch.products.len();
        tracing::debug!(page, received, total_count = batch.total_count, "Fetched catalog page");

        if received == 0 {
            break;
        }
        products.extend(batch.products);

        let done = if batch.total_count > 0 {
            products.len() as u64 >= batch.total_count
        } else {
            received < page_size as usize
        };
        if done {
            break;
        }
        page += 1;
    }

    Ok(products)
}

/// Build the product source described by `config`: the snapshot file when
/// one is set, the public API otherwise.
pub fn from_config(config: &CatalogConfig) -> Result<Box<dyn ProductLister>, CatalogError> {
    match &config.snapshot_file {
        Some(path) => Ok(Box::new(SnapshotCatalog::new(path))),
        None => Ok(Box::new(CatalogClient::from_config(config)?)),
    }
}
