//! `get`: newest-first scan across every table, filter-guarded.

use crate::Manager;
use anyhow::Result;

impl Manager {
    /// Returns the value for `key`, checking tables newest-first so a more
    /// recent write always shadows an older one. Each table's membership
    /// filter is consulted before touching its index or data file.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        for table in self.tables.iter().rev() {
            if !table.might_contain(key) {
                continue;
            }
            if let Some(value) = table.read(key)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}
