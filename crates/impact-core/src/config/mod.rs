//! Configuration types for impact.
//!
//! Configuration is loaded from a single YAML (`impact.yaml`) or TOML
//! (`impact.toml`) file. Every field has a default, so an empty file and a
//! missing file behave the same.
//!
//! # Sections
//!
//! - **catalog**: API base URL, timeout, page size, optional snapshot file
//! - **defaults**: fallback zone/region when the plan carries no variables
//! - **output**: report format and row ordering
//! - **logging**: default log level when `RUST_LOG` is unset
//!
//! `IMPACT_SCW_API_BASE_URL` overrides `catalog.api_base_url`. API
//! credentials come from the `SCW_*` variables only (see [`Credentials`]).

pub mod catalog;
pub mod credentials;
pub mod output;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use catalog::{CatalogConfig, parse_api_base_url};
pub use credentials::Credentials;
pub use output::{OutputConfig, OutputFormat, SortKey};

/// Environment variable overriding the catalog API base URL.
pub const ENV_API_BASE_URL: &str = "IMPACT_SCW_API_BASE_URL";

/// Complete impact configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Product catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Locality defaults for plans without zone/region variables.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Report rendering.
    #[serde(default)]
    pub output: OutputConfig,

    /// Log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fallback locality applied to changes whose plan has none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub zone: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImpactConfig {
    /// Load configuration from a YAML or TOML file (by extension).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        if path.extension().map(|e| e == "toml").unwrap_or(false) {
            Self::from_toml(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty YAML document is `null`, not an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration and resolve paths relative to the file.
    ///
    /// This:
    /// - Resolves a relative `catalog.snapshot_file` against the config
    ///   file's directory
    /// - Applies environment overrides
    /// - Validates the result
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(snapshot) = &config.catalog.snapshot_file
            && !snapshot.is_absolute()
        {
            config.catalog.snapshot_file = Some(base_dir.join(snapshot));
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.catalog.api_base_url = url.trim().to_string();
        }
    }

    /// Validate settings that have no meaningful default fallback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog
            .validate()
            .map_err(|e| ConfigError::Config(format!("could not validate catalog.{}", e)))?;

        if self.catalog.page_size == 0 {
            return Err(ConfigError::Config(
                "catalog.page_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
