//! Compaction: once the live table count grows past the configured
//! threshold, merge the three oldest Sealed tables into one.

use crate::Manager;
use anyhow::Result;
use sstable::{SSTable, TableState};

impl Manager {
    /// Triggers compaction when the total table count (Active + Sealed)
    /// exceeds `compaction_threshold`. A no-op if fewer than three Sealed
    /// tables exist yet, since there is nothing to merge.
    pub fn maybe_compact(&mut self) -> Result<()> {
        if self.tables.len() <= self.compaction_threshold {
            return Ok(());
        }
        self.compact_three_oldest_sealed()
    }

    /// Merges the three oldest Sealed tables (by `creation_time`, ties
    /// broken by name) into a single new Sealed table, preserving
    /// last-writer-wins semantics, then deletes the three source tables.
    fn compact_three_oldest_sealed(&mut self) -> Result<()> {
        let sealed_positions: Vec<usize> = self
            .tables
            .iter()
            .enumerate()
            .filter(|(_, t)| t.state() == TableState::Sealed)
            .map(|(i, _)| i)
            .take(3)
            .collect();

        if sealed_positions.len() < 3 {
            return Ok(());
        }

        // The merged table must occupy the sources' position in the
        // creation_time ordering, not jump to the front with a fresh mtime:
        // a table created after the sources (but before compaction ran)
        // could otherwise be shadowed by a merge that only ever holds older
        // data.
        let merge_time = sealed_positions
            .iter()
            .map(|&idx| self.tables[idx].creation_time())
            .max()
            .expect("sealed_positions has at least three entries");

        let merged_name = self.next_name();
        let mut merged = SSTable::create(
            &self.dir,
            &merged_name,
            self.bloom_filter_size,
            self.bloom_hash_count,
        )?;
        merged.set_creation_time(merge_time);

        // sealed_positions is ascending (oldest first); within each table,
        // sort keys for a deterministic write order.
        for &idx in &sealed_positions {
            let source = &self.tables[idx];
            let mut keys = source.all_keys();
            keys.sort_unstable();
            for key in keys {
                if let Some(value) = source.read(&key)? {
                    merged.write(&key, &value)?;
                }
            }
        }
        merged.seal();

        let mut source_names = Vec::with_capacity(3);
        for &idx in sealed_positions.iter().rev() {
            let table = self.tables.remove(idx);
            source_names.push(table.name().to_string());
            table.delete()?;
        }

        self.tables.push(merged);
        self.tables.sort_by(Manager::table_order);

        tracing::info!(
            merged = %merged_name,
            sources = ?source_names,
            "compacted three oldest sealed tables"
        );
        Ok(())
    }
}
