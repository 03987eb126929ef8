//! Provider error type
//!
//! Every failure a lifecycle operation can report to the host runtime.
//! None of these are retried; the runtime shows them as diagnostics.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing or malformed provider configuration
    #[error("invalid provider configuration: {0}")]
    Configuration(String),

    /// The OS random source could not supply bytes for a new prune key
    #[error("failed to generate random prune key: {0}")]
    KeyGeneration(#[source] rand::Error),

    /// Payload serialization or request construction failed
    #[error("failed to create request: {0}")]
    Request(String),

    /// The prune call never got a response (connect, TLS, timeout, ...)
    #[error("failed to call prune endpoint: {0}")]
    Transport(#[source] reqwest::Error),

    /// The prune endpoint answered with something other than 200/204
    #[error("prune endpoint returned error status {}: {body}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    #[error("resource ID is empty")]
    EmptyId,

    #[error("unknown resource type: {0}")]
    UnknownResource(String),

    #[error("invalid {resource_type} state: {source}")]
    InvalidState {
        resource_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    /// HTTP status of a rejected prune call, if that is what this is
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_includes_code_and_body() {
        let err = ProviderError::Status {
            status: StatusCode::FORBIDDEN,
            body: r#"{"error":"forbidden"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("forbidden"));
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_empty_id_message() {
        assert_eq!(ProviderError::EmptyId.to_string(), "resource ID is empty");
        assert_eq!(ProviderError::EmptyId.status(), None);
    }
}
