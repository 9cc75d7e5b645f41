//! # Cache
//!
//! The in-memory front-line tier of driftkv: a concurrent string-to-string
//! mapping the router writes to and reads from before ever consulting the
//! persistence manager.
//!
//! Backed by [`dashmap::DashMap`], which shards its internal locking so
//! reads and writes on different keys proceed without contending on a
//! single mutex. Per-key operations are linearizable; there is no ordering
//! guarantee across keys.
//!
//! Eviction is unbounded: the cache never forgets a key on its own. A key
//! written through [`Cache::put`] is visible to [`Cache::get`] immediately
//! after `put` returns, so the router can acknowledge a write the moment
//! the cache accepts it.

use dashmap::DashMap;

/// A concurrent key-value mapping with no eviction policy.
#[derive(Default)]
pub struct Cache {
    map: DashMap<String, String>,
}

impl Cache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self { map: DashMap::new() }
    }

    /// Inserts or overwrites `key` with `value`.
    pub fn put(&self, key: String, value: String) {
        self.map.insert(key, value);
    }

    /// Returns a clone of the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    /// Returns the number of keys currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the cache holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests;
