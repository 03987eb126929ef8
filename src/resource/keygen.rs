//! Prune key generation

use crate::error::{ProviderError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::{Builder, Uuid};

/// Use the caller's key verbatim when it is non-empty, otherwise mint a
/// random v4 UUID.
pub fn resolve_prune_key(supplied: Option<&str>) -> Result<String> {
    match supplied {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => generate_prune_key(),
    }
}

/// Random v4 UUID from the OS random source, lowercase hyphenated.
pub fn generate_prune_key() -> Result<String> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(ProviderError::KeyGeneration)?;

    Ok(Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string())
}

/// Whether `key` has the shape of a generated key
pub fn is_generated_key(key: &str) -> bool {
    Uuid::try_parse(key)
        .map(|u| u.get_version_num() == 4 && u.hyphenated().to_string() == key)
        .unwrap_or(false)
}
