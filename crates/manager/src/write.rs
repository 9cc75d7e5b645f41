//! `put` and the seal-and-roll transition it may trigger.

use crate::Manager;
use anyhow::Result;
use sstable::SSTable;

impl Manager {
    /// Appends `key`/`value` to the Active table. If the Active table's key
    /// count has reached `max_keys_per_sstable`, seals it, rolls to a fresh
    /// Active table, and evaluates compaction — all before returning, since
    /// the manager has no background scheduler of its own.
    pub fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let idx = self.active_index()?;
        self.tables[idx].write(key, value)?;

        if self.tables[idx].key_count() >= self.max_keys_per_sstable {
            self.seal_and_roll()?;
            self.maybe_compact()?;
        }
        Ok(())
    }

    /// Seals the current Active table and creates a new one in its place.
    pub fn seal_and_roll(&mut self) -> Result<()> {
        let idx = self.active_index()?;
        self.tables[idx].seal();
        let sealed_name = self.tables[idx].name().to_string();

        let new_name = self.next_name();
        let new_active = SSTable::create(
            &self.dir,
            &new_name,
            self.bloom_filter_size,
            self.bloom_hash_count,
        )?;
        self.tables.push(new_active);
        self.tables.sort_by(Manager::table_order);

        tracing::info!(sealed = %sealed_name, new_active = %new_name, "rolled active table");
        Ok(())
    }
}
