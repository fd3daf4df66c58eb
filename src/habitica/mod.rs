//! Rate-limited Habitica API client.
//!
//! All network traffic flows through one paced transport ([`Transport`])
//! that serializes requests, enforces a minimum inter-request gap and
//! retries rate-limited or transient failures with exponential backoff.
//! [`CachedHabiticaClient`] is the entry point: list fetch, batched history
//! enrichment, normalization and result caching.

pub mod api_types;
mod batch;
mod cache;
mod cached_client;
mod client;
mod error;
mod transport;
pub mod types;

pub use cache::TaskQuery;
pub use cached_client::CachedHabiticaClient;
pub use client::HabiticaClient;
pub use error::ApiError;
pub use transport::{Credentials, Transport};
