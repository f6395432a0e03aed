//! CLI command implementations.

pub mod actual;
pub mod badge;
pub mod doctor;
pub mod plan;

use anyhow::{Context, Result};
use impact_core::ImpactConfig;
use std::path::Path;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "impact.yaml";

/// Load the configuration from `path`, from `./impact.yaml` when present,
/// or fall back to defaults. Environment overrides apply in every case.
pub fn load_config(path: Option<&Path>) -> Result<ImpactConfig> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let path = match path {
        Some(path) => Some(path),
        None if default_path.exists() => Some(default_path),
        None => None,
    };

    match path {
        Some(path) => ImpactConfig::load_with_context(path)
            .with_context(|| format!("could not load config {}", path.display())),
        None => ImpactConfig::from_env().context("could not load config from environment"),
    }
}
