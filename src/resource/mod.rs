//! Managed resources
//!
//! # Architecture
//!
//! - [`registry`] - Provider and resource schemas from embedded JSON
//! - [`dispatch`] - Routes a resource type + operation to its handler
//! - [`host`] - The `yeet_host` lifecycle
//! - [`keygen`] - Prune key generation
//!
//! # Example
//!
//! ```ignore
//! use yeet_provider::resource::dispatch;
//!
//! async fn destroy(client: &YeetClient, state: &Value) -> yeet_provider::Result<Value> {
//!     dispatch::delete("yeet_host", client, state).await
//! }
//! ```

pub mod dispatch;
pub mod host;
pub mod keygen;
mod registry;

pub use registry::*;
