//! Authenticated environmental footprint API client.
//!
//! `GET {base}/environmental-footprint/v1alpha1/data/query`, authenticated
//! with the secret key in `X-Auth-Token`.

use async_trait::async_trait;
use impact_core::config::credentials;
use impact_core::{CatalogConfig, Credentials};
use std::time::Duration;

use crate::{FootprintError, ImpactData, ImpactDataSource, ImpactQuery};

const QUERY_PATH: &str = "environmental-footprint/v1alpha1/data/query";
const AUTH_HEADER: &str = "X-Auth-Token";

/// HTTP client for measured footprint data.
#[derive(Clone)]
pub struct FootprintClient {
    client: reqwest::Client,
    query_url: String,
    secret_key: String,
}

impl std::fmt::Debug for FootprintClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FootprintClient")
            .field("query_url", &self.query_url)
            .finish_non_exhaustive()
    }
}

impl FootprintClient {
    /// Create a client for `base_url`. Both the access and the secret key
    /// must be set.
    pub fn new(credentials: &Credentials, base_url: &str) -> Result<Self, FootprintError> {
        Self::with_client(reqwest::Client::new(), credentials, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        credentials: &Credentials,
        base_url: &str,
    ) -> Result<Self, FootprintError> {
        if credentials.access_key.is_none() {
            return Err(FootprintError::MissingCredential(credentials::ENV_ACCESS_KEY));
        }
        let secret_key = credentials
            .secret_key
            .clone()
            .ok_or(FootprintError::MissingCredential(credentials::ENV_SECRET_KEY))?;

        let base = impact_core::parse_api_base_url(base_url).map_err(FootprintError::InvalidBaseUrl)?;
        Ok(Self {
            client,
            query_url: format!("{}/{}", base.as_str().trim_end_matches('/'), QUERY_PATH),
            secret_key,
        })
    }

    /// Create a client with the API base URL, timeout and user agent from
    /// `config`.
    pub fn from_config(config: &CatalogConfig, credentials: &Credentials) -> Result<Self, FootprintError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Self::with_client(client, credentials, &config.api_base_url)
    }

    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    pub async fn query(&self, query: &ImpactQuery) -> Result<ImpactData, FootprintError> {
        let response = self
            .client
            .get(&self.query_url)
            .header(AUTH_HEADER, &self.secret_key)
            .query(&query.query_pairs())
            .send()
            .await?;

        let data: ImpactData = Self::parse_response(response).await?;
        tracing::info!(
            projects = data.projects.len(),
            kg_co2e = data.total_impact.kg_co2_equivalent,
            "Fetched impact data"
        );
        Ok(data)
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FootprintError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FootprintError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FootprintError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ImpactDataSource for FootprintClient {
    async fn query_impact_data(&self, query: &ImpactQuery) -> Result<ImpactData, FootprintError> {
        self.query(query).await
    }
}
