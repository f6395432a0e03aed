//! Footprint API errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FootprintError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("footprint request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("footprint API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("invalid footprint base URL: {0}")]
    InvalidBaseUrl(String),

    /// A credential variable needed to authenticate is unset.
    #[error("could not create footprint client: {0} is empty")]
    MissingCredential(&'static str),
}
