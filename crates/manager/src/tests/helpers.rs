use crate::ManagerConfig;
use std::fs;
use std::path::Path;

pub fn small_config() -> ManagerConfig {
    ManagerConfig {
        bloom_filter_size: 1024,
        bloom_hash_count: 4,
        max_keys_per_sstable: 2,
        compaction_threshold: 3,
    }
}

pub fn count_sst_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| ext == "sst")
                .unwrap_or(false)
        })
        .count()
}
