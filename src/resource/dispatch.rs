//! Lifecycle Dispatch
//!
//! Maps a resource type and operation to its typed handler. Input and
//! output are the untyped JSON the host runtime stores.

use super::host::{self, HostConfig, HostState};
use super::registry::{get_resource_schema, Operation};
use crate::error::{ProviderError, Result};
use crate::yeet::client::YeetClient;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Run `op` for `resource_type`.
///
/// `input` is the resource configuration for create and the current state
/// for read and delete. The returned value is the new state.
pub async fn invoke(
    resource_type: &str,
    op: Operation,
    client: &YeetClient,
    input: &Value,
) -> Result<Value> {
    tracing::debug!("invoke: resource={}, op={}", resource_type, op);

    let supported = get_resource_schema(resource_type)
        .map(|def| def.supports(op))
        .unwrap_or(false);
    if !supported {
        return Err(ProviderError::UnknownResource(resource_type.to_string()));
    }

    match resource_type {
        host::RESOURCE_TYPE => invoke_host(op, client, input).await,
        _ => Err(ProviderError::UnknownResource(resource_type.to_string())),
    }
}

pub async fn create(resource_type: &str, client: &YeetClient, config: &Value) -> Result<Value> {
    invoke(resource_type, Operation::Create, client, config).await
}

pub async fn read(resource_type: &str, client: &YeetClient, state: &Value) -> Result<Value> {
    invoke(resource_type, Operation::Read, client, state).await
}

pub async fn delete(resource_type: &str, client: &YeetClient, state: &Value) -> Result<Value> {
    invoke(resource_type, Operation::Delete, client, state).await
}

// =============================================================================
// yeet_host
// =============================================================================

async fn invoke_host(op: Operation, client: &YeetClient, input: &Value) -> Result<Value> {
    let state = match op {
        Operation::Create => {
            let config: HostConfig = decode(host::RESOURCE_TYPE, input)?;
            host::create(&config)?
        }
        Operation::Read => {
            let state: HostState = decode(host::RESOURCE_TYPE, input)?;
            host::read(&state)?
        }
        Operation::Delete => {
            let mut state: HostState = decode(host::RESOURCE_TYPE, input)?;
            host::delete(client, &mut state).await?;
            state
        }
    };

    encode(host::RESOURCE_TYPE, &state)
}

// =============================================================================
// Helpers
// =============================================================================

/// `null` decodes as an empty object so an omitted block means "all unset"
fn decode<T: DeserializeOwned>(resource_type: &str, input: &Value) -> Result<T> {
    let input = if input.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        input.clone()
    };

    serde_json::from_value(input).map_err(|source| ProviderError::InvalidState {
        resource_type: resource_type.to_string(),
        source,
    })
}

fn encode<T: serde::Serialize>(resource_type: &str, state: &T) -> Result<Value> {
    serde_json::to_value(state).map_err(|source| ProviderError::InvalidState {
        resource_type: resource_type.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yeet::client::ApiKey;
    use crate::yeet::http::YeetHttpClient;
    use serde_json::json;

    fn client() -> YeetClient {
        // Nothing listens here; only delete would touch the network.
        YeetClient::new(
            ApiKey::new("abc"),
            "http://127.0.0.1:1",
            YeetHttpClient::new(false).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_then_read_round_trips_key() {
        let client = client();
        let state = create("yeet_host", &client, &json!({"prune_key": "abc-123"}))
            .await
            .unwrap();
        assert_eq!(state, json!({"id": "abc-123", "prune_key": "abc-123"}));

        let refreshed = read("yeet_host", &client, &state).await.unwrap();
        assert_eq!(refreshed, state);
    }

    #[tokio::test]
    async fn test_create_with_null_config_generates_key() {
        let state = create("yeet_host", &client(), &Value::Null).await.unwrap();
        let id = state["id"].as_str().unwrap();
        assert!(crate::resource::keygen::is_generated_key(id));
        assert_eq!(state["prune_key"], state["id"]);
    }

    #[tokio::test]
    async fn test_read_empty_id_fails() {
        let err = read("yeet_host", &client(), &json!({"id": "", "prune_key": "k"}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "resource ID is empty");
    }

    #[tokio::test]
    async fn test_read_missing_id_fails() {
        let err = read("yeet_host", &client(), &json!({})).await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyId));
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let err = create("yeet_cluster", &client(), &json!({})).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(ref t) if t == "yeet_cluster"));
    }

    #[tokio::test]
    async fn test_malformed_config_rejected() {
        let err = create("yeet_host", &client(), &json!({"prune_key": 42}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidState { .. }));

        let err = create("yeet_host", &client(), &json!({"name": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_failed_delete_is_transport_error() {
        let err = delete("yeet_host", &client(), &json!({"id": "k", "prune_key": "k"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)), "{err:?}");
    }
}
