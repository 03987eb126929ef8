//! Yeet Client
//!
//! The resolved provider configuration: credentials, API host and the
//! shared HTTP transport. Built once per provider run and handed by
//! reference to every resource operation.

use super::http::{sanitize_for_log, YeetHttpClient};
use crate::error::{ProviderError, Result};
use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;

/// API key for the yeet API. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Serialize)]
struct PruneRequest<'a> {
    prune_key: &'a str,
}

/// Main yeet client
#[derive(Debug, Clone)]
pub struct YeetClient {
    api_key: ApiKey,
    host: String,
    pub http: YeetHttpClient,
}

impl YeetClient {
    /// Assemble a client. `host` is used as given, minus any trailing `/`.
    pub fn new(api_key: ApiKey, host: &str, http: YeetHttpClient) -> Self {
        Self {
            api_key,
            host: host.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Base URL of the yeet API
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Build a yeet API URL
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.host, path.trim_start_matches('/'))
    }

    /// Host prune endpoint
    pub fn hosts_prune_url(&self) -> String {
        self.api_url("hosts/prune")
    }

    /// Tell the API to prune the host registered under `prune_key`.
    /// 200 and 204 are success; anything else is returned as an error
    /// carrying the status and response body.
    pub async fn prune_host(&self, prune_key: &str) -> Result<()> {
        let url = self.hosts_prune_url();
        let response = self
            .http
            .post_json(&url, self.api_key.expose(), &PruneRequest { prune_key })
            .await?;

        match response.status {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => {
                tracing::error!("Prune rejected: {} - {}", status, sanitize_for_log(&response.body));
                Err(ProviderError::Status {
                    status,
                    body: response.body,
                })
            }
        }
    }
}
