//! Public product catalog API client.
//!
//! Only the unauthenticated listing endpoint is used:
//! `GET {base}/product-catalog/v2alpha1/public-catalog/products`.

use async_trait::async_trait;
use impact_core::{CatalogConfig, CatalogProduct};
use std::time::Duration;

use crate::{CatalogError, DEFAULT_PAGE_SIZE, PageFetcher, ProductLister, ProductPage, list_all_pages};

const PRODUCTS_PATH: &str = "product-catalog/v2alpha1/public-catalog/products";

/// HTTP client for the public product catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    products_url: String,
    page_size: u32,
}

impl CatalogClient {
    /// Create a client for `base_url`, which must be an absolute https URL.
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, CatalogError> {
        let base = validate_base_url(base_url)?;
        Ok(Self {
            client,
            products_url: format!("{}/{}", base.as_str().trim_end_matches('/'), PRODUCTS_PATH),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Create a client with the timeout, user agent and page size from
    /// `config`.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let mut catalog = Self::with_client(client, &config.api_base_url)?;
        catalog.page_size = config.page_size.max(1);
        Ok(catalog)
    }

    pub fn products_url(&self) -> &str {
        &self.products_url
    }

    /// Fetch a single page of products. `page` is 1-based.
    pub async fn list_products(&self, page: u32, page_size: u32) -> Result<ProductPage, CatalogError> {
        let response = self
            .client
            .get(&self.products_url)
            .query(&[("page", page), ("page_size", page_size)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PageFetcher for CatalogClient {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<ProductPage, CatalogError> {
        self.list_products(page, page_size).await
    }
}

#[async_trait]
impl ProductLister for CatalogClient {
    async fn list_all_products(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        let products = list_all_pages(self, self.page_size).await?;
        tracing::info!(
            products = products.len(),
            url = %self.products_url,
            "Fetched product catalog"
        );
        Ok(products)
    }
}

fn validate_base_url(base_url: &str) -> Result<reqwest::Url, CatalogError> {
    impact_core::parse_api_base_url(base_url).map_err(CatalogError::InvalidBaseUrl)
}
