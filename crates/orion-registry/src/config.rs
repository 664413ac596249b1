//! Endpoint configuration for the registry clients

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Base URLs and client settings. Loadable from TOML; every field has a
/// working default so a partial file (or none at all) is fine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// External bibliographic registry (Crossref-compatible)
    pub crossref_base_url: String,
    /// The portal's own publication API
    pub portal_base_url: String,
    /// Sent on every request; the external registry's polite pool asks
    /// for a contact address in it
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            crossref_base_url: "https://api.crossref.org".to_string(),
            portal_base_url: "http://127.0.0.1:8000/api".to_string(),
            user_agent: "orion-core/0.1 (mailto:support@orion-platform.org)".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, RegistryError> {
        toml::from_str(raw).map_err(|e| RegistryError::parse(format!("invalid config: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::parse(format!("unreadable config {:?}: {}", path, e)))?;
        Self::from_toml_str(&raw)
    }
}
