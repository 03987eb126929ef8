//! yeet_host resource
//!
//! A host is represented only by its prune key. Create mints (or adopts)
//! the key, read checks it is still in state, delete asks the API to prune
//! the host.

use super::keygen;
use crate::error::{ProviderError, Result};
use crate::yeet::client::YeetClient;
use serde::{Deserialize, Serialize};

/// Resource type name as registered with the host runtime
pub const RESOURCE_TYPE: &str = "yeet_host";

/// User-supplied configuration for a host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    #[serde(default)]
    pub prune_key: Option<String>,
}

/// Persisted state of a host. `id` always equals `prune_key` while the
/// host exists; an empty `id` means it has been destroyed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub prune_key: String,
}

impl HostState {
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Keys shorter than this are logged by length only
const MIN_HINT_KEY_CHARS: usize = 16;

/// Redact a key for log lines. Never returns the whole key.
fn key_hint(key: &str) -> String {
    let len = key.chars().count();
    if len < MIN_HINT_KEY_CHARS {
        return format!("<{len} chars>");
    }
    let prefix: String = key.chars().take(8).collect();
    format!("{prefix}...")
}

/// absent -> present. No remote call.
pub fn create(config: &HostConfig) -> Result<HostState> {
    let supplied = config.prune_key.as_deref().filter(|k| !k.is_empty());
    let prune_key = keygen::resolve_prune_key(supplied)?;

    tracing::info!(
        "Created {} {} ({})",
        RESOURCE_TYPE,
        key_hint(&prune_key),
        if supplied.is_some() { "supplied key" } else { "generated key" }
    );

    Ok(HostState {
        id: prune_key.clone(),
        prune_key,
    })
}

/// Only checks that the id survived in state; the API is not consulted.
pub fn read(state: &HostState) -> Result<HostState> {
    if state.id.is_empty() {
        return Err(ProviderError::EmptyId);
    }

    tracing::debug!("Read {} {}", RESOURCE_TYPE, key_hint(&state.id));
    Ok(state.clone())
}

/// present -> absent. `state.id` is cleared only after the API confirms
/// the prune; on any error the state is untouched and the delete can be
/// retried.
pub async fn delete(client: &YeetClient, state: &mut HostState) -> Result<()> {
    tracing::info!("Pruning {} {}", RESOURCE_TYPE, key_hint(&state.prune_key));

    client.prune_host(&state.prune_key).await?;

    state.id.clear();
    tracing::info!("Deleted {} {}", RESOURCE_TYPE, key_hint(&state.prune_key));
    Ok(())
}
