//! # Persistence Manager
//!
//! Owns the set of SSTables backing one data directory: routes writes to
//! the Active table, searches Sealed tables on read, and triggers
//! sealing/compaction as the Active table fills up.
//!
//! ```text
//!              put(k, v)                      get(k)
//!                 |                              |
//!                 v                              v
//!         write to Active table        newest-first scan: filter
//!                 |                    check, then index, then
//!                 v                    seek+read, per table
//!       key_count >= threshold?
//!                 |
//!            yes  v
//!         seal + roll + maybe_compact
//! ```
//!
//! A directory is owned exclusively by one [`Manager`]; running two against
//! the same directory is undefined, matching the single-writer contract the
//! on-disk format assumes.
//!
//! ## Module responsibilities
//!
//! | Module | Purpose |
//! |---|---|
//! | [`recovery`] | Rescans `*.sst` files at startup, rebuilds tables, creates a fresh Active table |
//! | [`write`] | `put`, `seal_and_roll` |
//! | [`read`] | `get` |
//! | [`compaction`] | `maybe_compact`, merging the three oldest Sealed tables |
//! | [`actor`] | Wraps [`Manager`] in a `tokio` actor task with a mailbox, delegating blocking I/O to `spawn_blocking` |

mod actor;
mod compaction;
mod read;
mod recovery;
mod write;

pub use actor::ManagerHandle;

use sstable::SSTable;
use std::path::PathBuf;
use std::time::SystemTime;

/// Sizing knobs the manager needs; a subset of the process-wide
/// configuration relevant to table creation and policy.
#[derive(Debug, Clone, Copy)]
pub struct ManagerConfig {
    pub bloom_filter_size: u64,
    pub bloom_hash_count: u32,
    pub max_keys_per_sstable: usize,
    /// Total table count (Active + Sealed) beyond which compaction runs.
    pub compaction_threshold: usize,
}

/// Owns every [`SSTable`] for one data directory, ordered by `creation_time`
/// ascending. Exactly one table has [`Sealed`](sstable::TableState::Sealed)
/// state false (the Active table) at any time.
pub struct Manager {
    pub(crate) dir: PathBuf,
    pub(crate) tables: Vec<SSTable>,
    pub(crate) next_id: u64,
    pub(crate) bloom_filter_size: u64,
    pub(crate) bloom_hash_count: u32,
    pub(crate) max_keys_per_sstable: usize,
    pub(crate) compaction_threshold: usize,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("dir", &self.dir)
            .field("table_count", &self.tables.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Manager {
    pub(crate) fn next_name(&mut self) -> String {
        let name = format!("sstable_{}", self.next_id);
        self.next_id += 1;
        name
    }

    pub(crate) fn active_index(&self) -> anyhow::Result<usize> {
        self.tables
            .iter()
            .position(|t| t.state() == sstable::TableState::Active)
            .ok_or_else(|| anyhow::anyhow!("programmer error: no active table"))
    }

    /// Orders tables by `creation_time` ascending, breaking ties on table
    /// name so compaction's oldest-three selection is deterministic.
    pub(crate) fn table_order(a: &SSTable, b: &SSTable) -> std::cmp::Ordering {
        creation_key(a).cmp(&creation_key(b))
    }

    /// Returns the number of tables currently owned (Active + Sealed).
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Returns the key count of the Active table.
    pub fn active_key_count(&self) -> anyhow::Result<usize> {
        let idx = self.active_index()?;
        Ok(self.tables[idx].key_count())
    }

    /// Returns the names of every Sealed table, oldest first.
    #[must_use]
    pub fn sealed_table_names(&self) -> Vec<String> {
        self.tables
            .iter()
            .filter(|t| t.state() == sstable::TableState::Sealed)
            .map(|t| t.name().to_string())
            .collect()
    }
}

fn creation_key(t: &SSTable) -> (SystemTime, String) {
    (t.creation_time(), t.name().to_string())
}

#[cfg(test)]
mod tests;
