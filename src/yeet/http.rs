//! HTTP utilities for yeet REST API calls

use crate::error::{ProviderError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Serialize;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("terraform-provider-yeet/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Status and raw body of a completed request
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client wrapper for yeet API calls
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct YeetHttpClient {
    client: Client,
    insecure: bool,
}

impl YeetHttpClient {
    /// Create a new HTTP client. With `insecure` set, TLS certificates are
    /// not verified.
    pub fn new(insecure: bool) -> Result<Self> {
        if insecure {
            tracing::warn!("TLS certificate verification disabled");
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(|e| ProviderError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, insecure })
    }

    /// Whether certificate verification is skipped
    pub fn is_insecure(&self) -> bool {
        self.insecure
    }

    /// POST a JSON body with bearer auth. Any status is returned to the
    /// caller, who decides what counts as success; only transport failures
    /// are errors here.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        token: &str,
        body: &T,
    ) -> Result<RawResponse> {
        tracing::debug!("POST {}", url);

        let payload =
            serde_json::to_vec(body).map_err(|e| ProviderError::Request(format!("failed to marshal request payload: {e}")))?;

        let request = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ProviderError::Transport)?;

        let status = response.status();
        // The body is diagnostics only; a failed read leaves it empty.
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read response body ({}): {}", status, e);
                String::new()
            }
        };

        Ok(RawResponse { status, body })
    }
}
