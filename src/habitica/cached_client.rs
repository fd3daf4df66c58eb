//! Cached Habitica client that wraps HabiticaClient with transparent caching.

use color_eyre::{eyre::eyre, Result};

use crate::cache::{CacheLayer, CacheResult};
use crate::config::Config;

use super::cache::TaskQuery;
use super::client::HabiticaClient;
use super::transport::Credentials;
use super::types::EnrichedDaily;

/// Habitica client with transparent caching support.
///
/// Wraps the underlying HabiticaClient and provides the same API, but keeps
/// the assembled result of each query for the configured time-to-live so a
/// process does not repeat a full fetch cycle.
#[derive(Clone)]
pub struct CachedHabiticaClient {
  inner: HabiticaClient,
  cache: CacheLayer<Vec<EnrichedDaily>>,
}

impl CachedHabiticaClient {
  /// Create a new cached Habitica client.
  pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
    let inner = HabiticaClient::new(&config.habitica.base_url, credentials, &config.client)?;
    let cache = CacheLayer::new(config.client.cache_expiration());

    Ok(Self { inner, cache })
  }

  /// Get daily tasks with their normalized completion histories.
  ///
  /// A valid cached payload is returned unchanged; otherwise the full
  /// fetch cycle runs and repopulates the cache.
  pub async fn get_dailies(&self) -> Result<CacheResult<Vec<EnrichedDaily>>> {
    let query = TaskQuery::Dailies;

    self
      .cache
      .fetch(query.cache_key(), || {
        let inner = self.inner.clone();
        async move {
          inner
            .get_dailies()
            .await
            .map_err(|e| eyre!("Failed to fetch {}: {}", query.description(), e))
        }
      })
      .await
  }

  /// Drop any cached payload so the next call refetches.
  pub fn invalidate(&self) {
    self.cache.invalidate(TaskQuery::Dailies.cache_key());
  }
}
