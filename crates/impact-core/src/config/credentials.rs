//! Scaleway API credentials.
//!
//! Credentials are only read from the environment, never from the config
//! file.

use std::fmt;

pub const ENV_ACCESS_KEY: &str = "SCW_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "SCW_SECRET_KEY";
pub const ENV_ORGANIZATION_ID: &str = "SCW_ORGANIZATION_ID";

/// Credentials for the authenticated Scaleway APIs. Blank values are
/// treated as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub organization_id: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials using `lookup` to resolve variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            access_key: read(ENV_ACCESS_KEY),
            secret_key: read(ENV_SECRET_KEY),
            organization_id: read(ENV_ORGANIZATION_ID),
        }
    }

    /// Names of the unset credential variables: access key, secret key,
    /// organization ID, in that order.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (ENV_ACCESS_KEY, &self.access_key),
            (ENV_SECRET_KEY, &self.secret_key),
            (ENV_ORGANIZATION_ID, &self.organization_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

// Secrets stay out of logs and panics.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key.as_ref().map(|_| "<set>"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<set>"))
            .field("organization_id", &self.organization_id)
            .finish()
    }
}
