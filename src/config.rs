//! Provider Configuration
//!
//! Turns the provider configuration block into a [`YeetClient`].
//! Precedence for each attribute: explicit value > environment > default.

use crate::error::{ProviderError, Result};
use crate::yeet::client::{ApiKey, YeetClient};
use crate::yeet::http::YeetHttpClient;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default yeet API host
pub const DEFAULT_HOST: &str = "https://api.yeet.cx";

/// Environment variable consulted when `api_key` is not configured
pub const API_KEY_ENV: &str = "YEET_API_KEY";

/// Provider configuration block, as supplied by the host runtime
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub insecure: Option<bool>,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl ProviderSettings {
    /// Load a configuration block from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ProviderError::Configuration(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Overlay values from `other` that are set
    pub fn merge(mut self, other: ProviderSettings) -> Self {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.insecure.is_some() {
            self.insecure = other.insecure;
        }
        self
    }

    /// Get effective API key (config > YEET_API_KEY)
    pub fn effective_api_key(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env(API_KEY_ENV).filter(|k| !k.is_empty()))
    }

    /// Get effective host (config > default)
    pub fn effective_host(&self) -> String {
        self.host
            .clone()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn effective_insecure(&self) -> bool {
        self.insecure.unwrap_or(false)
    }

    /// Resolve against the process environment
    pub fn resolve(&self) -> Result<YeetClient> {
        self.resolve_with_env(|name| std::env::var(name).ok())
    }

    /// Resolve into a client. No network traffic happens here.
    pub fn resolve_with_env(&self, env: impl Fn(&str) -> Option<String>) -> Result<YeetClient> {
        let Some(api_key) = self.effective_api_key(env) else {
            return Err(ProviderError::Configuration(format!(
                "api_key is required (set it in the provider block or via {API_KEY_ENV})"
            )));
        };

        let host = self.effective_host();
        let parsed = url::Url::parse(&host)
            .map_err(|e| ProviderError::Configuration(format!("host {host:?} is not a valid URL: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ProviderError::Configuration(format!(
                "host {host:?} is not a valid base URL"
            )));
        }

        let insecure = self.effective_insecure();
        let http = YeetHttpClient::new(insecure)?;

        tracing::info!("Configured yeet provider for {} (insecure: {})", host, insecure);

        Ok(YeetClient::new(ApiKey::new(api_key), &host, http))
    }
}
