//! Cache layer that orchestrates caching logic with network fetching.
//!
//! Expiration is checked lazily on access; there is no background eviction.
//! An entry is either entirely absent, entirely valid, or entirely expired.

use chrono::{DateTime, Duration, Utc};
use color_eyre::Result;
use std::future::Future;
use std::sync::Arc;

use super::memory::MemoryStore;

/// Result from a cache operation, including where the data came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  pub data: T,
  pub source: CacheSource,
  /// When the data was stored (if served from cache).
  pub cached_at: Option<DateTime<Utc>>,
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data from cache, still within its time-to-live
  CacheFresh,
}

pub struct CacheLayer<T> {
  store: Arc<MemoryStore<T>>,
  /// How long cached data stays valid
  ttl: Duration,
}

impl<T: Clone> CacheLayer<T> {
  pub fn new(ttl: Duration) -> Self {
    Self {
      store: Arc::new(MemoryStore::new()),
      ttl,
    }
  }

  fn is_expired(&self, stored_at: DateTime<Utc>) -> bool {
    Utc::now() - stored_at >= self.ttl
  }

  /// Look up a key, lazily evicting it when past its time-to-live.
  pub fn get(&self, key: &str) -> Option<T> {
    let entry = self.store.get(key)?;
    if self.is_expired(entry.stored_at) {
      self.store.invalidate(key);
      return None;
    }
    Some(entry.payload)
  }

  /// Store a payload wholesale under a key, stamped with the current time.
  pub fn set(&self, key: &str, payload: T) {
    self.store.set(key, payload);
  }

  pub fn invalidate(&self, key: &str) {
    self.store.invalidate(key);
  }

  /// Fetch with cache-first strategy.
  ///
  /// A valid entry is returned unchanged without touching the network. On a
  /// miss (or an expired entry) the fetcher runs, its result is stored and
  /// returned; a fetcher failure propagates and leaves the cache unpopulated.
  ///
  /// There is no single-flight guard: concurrent cold-cache callers each run
  /// their own fetch and the last one to finish wins the cache slot.
  pub async fn fetch<F, Fut>(&self, key: &str, fetcher: F) -> Result<CacheResult<T>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    if let Some(entry) = self.store.get(key) {
      if !self.is_expired(entry.stored_at) {
        return Ok(CacheResult {
          data: entry.payload,
          source: CacheSource::CacheFresh,
          cached_at: Some(entry.stored_at),
        });
      }
      self.store.invalidate(key);
    }

    let data = fetcher().await?;
    self.store.set(key, data.clone());
    Ok(CacheResult {
      data,
      source: CacheSource::Network,
      cached_at: None,
    })
  }
}

impl<T> Clone for CacheLayer<T> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      ttl: self.ttl,
    }
  }
}
