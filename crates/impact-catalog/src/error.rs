//! Catalog source errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("catalog API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("could not read catalog snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode catalog snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
