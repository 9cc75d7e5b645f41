//! # Configuration
//!
//! Loads driftkv's JSON configuration file and validates it before any
//! component is constructed.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory the persistence manager owns exclusively.
    #[serde(default = "default_sstable_directory")]
    pub sstable_directory: String,

    /// Number of bits (`M`) in each SSTable's membership filter.
    #[serde(default = "default_bloom_filter_size")]
    pub bloom_filter_size: u64,

    /// Number of hash probes (`K`) in each SSTable's membership filter.
    #[serde(default = "default_bloom_hash_count")]
    pub bloom_hash_count: u32,

    /// Key-count threshold that triggers sealing the Active table.
    #[serde(default = "default_max_keys_per_sstable")]
    pub max_keys_per_sstable: usize,

    /// Number of sealed tables that triggers compaction of the three oldest.
    #[serde(default = "default_compaction_threshold")]
    pub compaction_threshold: usize,

    /// Number of cache actor instances.
    #[serde(default = "default_cache_instances")]
    pub cache_instances: usize,

    /// Number of router actor instances.
    #[serde(default = "default_router_instances")]
    pub router_instances: usize,

    /// Size of the blocking-I/O worker pool the persistence manager
    /// delegates file operations to.
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,

    /// Address the HTTP ingress binds to.
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,
}

fn default_sstable_directory() -> String {
    "./data".to_string()
}
fn default_bloom_filter_size() -> u64 {
    8192
}
fn default_bloom_hash_count() -> u32 {
    4
}
fn default_max_keys_per_sstable() -> usize {
    1000
}
fn default_compaction_threshold() -> usize {
    3
}
fn default_cache_instances() -> usize {
    1
}
fn default_router_instances() -> usize {
    1
}
fn default_worker_pool_size() -> usize {
    4
}
fn default_http_addr() -> SocketAddr {
    "127.0.0.1:8080".parse().unwrap()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sstable_directory: default_sstable_directory(),
            bloom_filter_size: default_bloom_filter_size(),
            bloom_hash_count: default_bloom_hash_count(),
            max_keys_per_sstable: default_max_keys_per_sstable(),
            compaction_threshold: default_compaction_threshold(),
            cache_instances: default_cache_instances(),
            router_instances: default_router_instances(),
            worker_pool_size: default_worker_pool_size(),
            http_addr: default_http_addr(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file, falling back to defaults for
    /// any field the file omits.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading config file {}", path.as_ref().display()))?;
        let cfg: Config = serde_json::from_str(&raw).context("parsing config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates invariants that the JSON schema alone cannot express.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.bloom_filter_size > 0, "bloomFilterSize must be > 0");
        ensure!(self.bloom_hash_count > 0, "bloomHashCount must be > 0");
        ensure!(
            self.max_keys_per_sstable > 0,
            "maxKeysPerSSTable must be > 0"
        );
        ensure!(
            self.compaction_threshold >= 2,
            "compactionThreshold must be >= 2 for merging to be meaningful"
        );
        ensure!(self.cache_instances > 0, "cacheInstances must be > 0");
        ensure!(self.router_instances > 0, "routerInstances must be > 0");
        ensure!(self.worker_pool_size > 0, "workerPoolSize must be > 0");
        Ok(())
    }
}
