//! In-memory cache storage.
//!
//! One entry per logical query key, overwritten wholesale on refresh and
//! never merged. Concurrent sets for the same key are last-write-wins; the
//! facade is the sole writer per key, so no stronger guarantee is needed.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct StoredEntry<T> {
  pub payload: T,
  pub stored_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MemoryStore<T> {
  entries: Mutex<HashMap<String, StoredEntry<T>>>,
}

impl<T: Clone> MemoryStore<T> {
  pub fn new() -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
    }
  }

  pub fn get(&self, key: &str) -> Option<StoredEntry<T>> {
    self.entries.lock().expect("cache mutex poisoned").get(key).cloned()
  }

  pub fn set(&self, key: &str, payload: T) {
    self.entries.lock().expect("cache mutex poisoned").insert(
      key.to_string(),
      StoredEntry {
        payload,
        stored_at: Utc::now(),
      },
    );
  }

  pub fn invalidate(&self, key: &str) {
    self.entries.lock().expect("cache mutex poisoned").remove(key);
  }
}
