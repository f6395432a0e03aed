//! Product catalog source configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Where the product catalog comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the public API (must be absolute https).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Products requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// User agent sent with catalog requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Read products from this JSON snapshot instead of the API.
    #[serde(default)]
    pub snapshot_file: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            user_agent: default_user_agent(),
            snapshot_file: None,
        }
    }
}

impl CatalogConfig {
    /// Check that the base URL is an absolute https URL.
    pub fn validate(&self) -> Result<(), String> {
        parse_api_base_url(&self.api_base_url).map(|_| ())
    }
}

/// Parse an API base URL, requiring the https scheme and a host.
///
/// Used by config validation and by the API clients.
pub fn parse_api_base_url(base_url: &str) -> Result<Url, String> {
    let url = Url::parse(base_url.trim()).map_err(|e| {
        format!("api_base_url must be a valid absolute URL, got '{base_url}': {e}")
    })?;

    if url.scheme() != "https" {
        return Err("api_base_url: https scheme is required".to_string());
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("api_base_url: missing host in '{base_url}'"));
    }

    Ok(url)
}

fn default_api_base_url() -> String {
    "https://api.scaleway.com".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_page_size() -> u32 {
    100
}

fn default_user_agent() -> String {
    format!("impact/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_plain_http_and_relative_urls() {
        let mut config = CatalogConfig::default();
        assert!(config.validate().is_ok());

        config.api_base_url = "http://api.scaleway.com".to_string();
        assert!(config.validate().unwrap_err().contains("https"));

        config.api_base_url = "api.scaleway.com".to_string();
        assert!(config.validate().unwrap_err().contains("absolute"));

        config.api_base_url = "https://".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_hosts() {
        for base in ["https://user@/", "https://exa mple.com", "https://[::1"] {
            assert!(parse_api_base_url(base).is_err(), "{base} should be rejected");
        }

        let url = parse_api_base_url(" https://proxy.internal/scw/ ").unwrap();
        assert_eq!(url.host_str(), Some("proxy.internal"));
        assert_eq!(url.path(), "/scw/");
    }
}
