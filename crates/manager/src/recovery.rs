//! Startup recovery: rescan the data directory, rebuild every table's index
//! and membership filter from its data file, and create a fresh Active
//! table to receive new writes.

use crate::{Manager, ManagerConfig};
use anyhow::Result;
use sstable::SSTable;
use std::path::Path;

impl Manager {
    /// Recovers a manager over `dir`, creating the directory if absent.
    ///
    /// Every `*.sst` file found is reopened as a Sealed table via
    /// [`SSTable::recover`], which rebuilds its index and filter by
    /// streaming the data file; any `.index` sidecar is ignored. A fresh
    /// Active table is always created afterward, so the directory ends up
    /// with exactly one more table than it had `.sst` files.
    pub fn recover(dir: &Path, cfg: &ManagerConfig) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let mut tables = Vec::new();
        let mut max_id = 0u64;

        let mut sst_paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "sst").unwrap_or(false))
            .collect();
        sst_paths.sort();

        for path in sst_paths {
            let table = SSTable::recover(path, cfg.bloom_filter_size, cfg.bloom_hash_count)?;
            if let Some(id) = parse_table_id(table.name()) {
                max_id = max_id.max(id);
            }
            tables.push(table);
        }

        tables.sort_by(Manager::table_order);
        tracing::info!(recovered_tables = tables.len(), dir = %dir.display(), "recovered persistence manager state");

        let mut manager = Manager {
            dir: dir.to_path_buf(),
            tables,
            next_id: max_id + 1,
            bloom_filter_size: cfg.bloom_filter_size,
            bloom_hash_count: cfg.bloom_hash_count,
            max_keys_per_sstable: cfg.max_keys_per_sstable,
            compaction_threshold: cfg.compaction_threshold,
        };

        let active_name = manager.next_name();
        let active = SSTable::create(
            &manager.dir,
            &active_name,
            manager.bloom_filter_size,
            manager.bloom_hash_count,
        )?;
        manager.tables.push(active);
        manager.tables.sort_by(Manager::table_order);

        Ok(manager)
    }
}

fn parse_table_id(name: &str) -> Option<u64> {
    name.strip_prefix("sstable_")?.parse().ok()
}
