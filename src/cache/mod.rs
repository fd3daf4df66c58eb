//! Generic in-memory caching layer.
//!
//! Stores the assembled result of a named logical query with a timestamp and
//! serves it until its time-to-live elapses. Staleness is checked lazily on
//! access; entries are overwritten wholesale, never merged.

mod layer;
mod memory;

pub use layer::{CacheLayer, CacheResult, CacheSource};
