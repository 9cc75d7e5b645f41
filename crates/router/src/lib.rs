//! # Router
//!
//! Stateless request dispatcher sitting in front of the [`cache::Cache`] and
//! [`manager::ManagerHandle`]. Transport-agnostic: this crate has no
//! knowledge of HTTP or JSON, so it can be exercised directly in tests
//! without a socket. The HTTP decoding/encoding lives one layer up, in the
//! process binary.

use anyhow::Result;
use cache::Cache;
use manager::ManagerHandle;
use std::sync::Arc;

/// One entry of a PUT batch: a key and its value fragments, joined with
/// `,` to form the stored value (mirroring the external HTTP contract,
/// where a value arrives as a JSON array of strings).
#[derive(Debug, Clone)]
pub struct NewKeyEntry {
    pub key: String,
    pub value: Vec<String>,
}

/// Fans PUTs out to the cache and persistence tiers, and serves GETs from
/// the cache first, falling back to persistence on a miss.
pub struct Router {
    cache: Arc<Cache>,
    persistence: ManagerHandle,
}

impl Router {
    #[must_use]
    pub fn new(cache: Arc<Cache>, persistence: ManagerHandle) -> Self {
        Self { cache, persistence }
    }

    /// Writes every entry to the cache, then to persistence, in that order.
    ///
    /// The cache write is infallible and always lands first, so a GET
    /// issued right after `put` returns is guaranteed to observe the new
    /// value even if it never needed to consult persistence. The call
    /// resolves only after persistence has accepted every entry in the
    /// batch; if persistence fails partway through, the cache is not rolled
    /// back (the next successful PUT or a compaction re-aligns the tiers).
    pub async fn put(&self, new_keys: Vec<NewKeyEntry>) -> Result<()> {
        let entries: Vec<(String, String)> = new_keys
            .into_iter()
            .map(|entry| (entry.key, entry.value.join(",")))
            .collect();

        for (key, value) in &entries {
            self.cache.put(key.clone(), value.clone());
        }

        for (key, value) in entries {
            self.persistence.put(key, value).await?;
        }

        Ok(())
    }

    /// Resolves each key against the cache, falling back to persistence on
    /// a miss, and returns results in input order. A stored value is split
    /// on `,` back into its original fragments; a missing key yields an
    /// empty vector rather than an error, matching the external contract's
    /// "empty array for NOT_FOUND".
    pub async fn get(&self, keys: Vec<String>) -> Vec<Vec<String>> {
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            let stored = match self.cache.get(&key) {
                Some(value) => Some(value),
                None => self.persistence.get(key.clone()).await.unwrap_or(None),
            };
            results.push(split_value(stored));
        }
        results
    }
}

fn split_value(stored: Option<String>) -> Vec<String> {
    match stored {
        None => Vec::new(),
        Some(value) => value.split(',').map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests;
