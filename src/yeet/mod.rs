//! yeet API interaction module
//!
//! # Module Structure
//!
//! - [`client`] - Resolved provider configuration and the prune call
//! - [`http`] - HTTP transport for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use yeet_provider::yeet::client::{ApiKey, YeetClient};
//! use yeet_provider::yeet::http::YeetHttpClient;
//!
//! async fn example() -> yeet_provider::Result<()> {
//!     let http = YeetHttpClient::new(false)?;
//!     let client = YeetClient::new(ApiKey::new("key"), "https://api.yeet.cx", http);
//!     client.prune_host("0f4c...").await
//! }
//! ```

pub mod client;
pub mod http;
