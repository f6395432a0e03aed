//! Plan decoding errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("could not read plan file: {0}")]
    Io(#[from] std::io::Error),

    #[error("plan payload too large ({size} bytes > {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("could not decode terraform plan json: {0}")]
    Json(#[from] serde_json::Error),
}
