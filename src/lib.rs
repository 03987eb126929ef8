//! yeet provider
//!
//! Provider plugin exposing one managed resource, `yeet_host`. A host is
//! identified by its prune key; destroying it calls
//! `POST {host}/hosts/prune` on the yeet API.
//!
//! - [`config`] - Provider configuration block and its resolution
//! - [`yeet`] - API client and HTTP transport
//! - [`resource`] - Schema registry, lifecycle dispatch and the host resource

pub mod config;
pub mod error;
pub mod resource;
pub mod yeet;

pub use config::ProviderSettings;
pub use error::{ProviderError, Result};
pub use yeet::client::YeetClient;
