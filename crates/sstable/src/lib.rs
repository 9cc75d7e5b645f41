//! # SSTable
//!
//! An on-disk table for the driftkv persistence core: an append-only data
//! file of `key,value\n` lines, a durable offset sidecar, and an owned
//! membership filter.
//!
//! A table starts life [`Active`](TableState::Active) and accepts writes
//! until the persistence manager seals it. Once [`Sealed`](TableState::Sealed)
//! it is read-only; it is destroyed only as part of compaction, once its
//! surviving keys have been merged into a fresh table.
//!
//! ## File layout
//!
//! ```text
//! <name>.sst    key,value\n  (one entry per line, append-only)
//! <name>.index  key,offset\n (rewritten in full after every successful write)
//! ```
//!
//! The sidecar is advisory only: the persistence manager always rebuilds the
//! index from the data file at startup (see [`SSTable::recover`]), so a
//! stale or missing sidecar never causes data loss.

use bloom::Filter;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Errors a table can surface to its owner (the persistence manager).
#[derive(Debug, Error)]
pub enum SstableError {
    /// Filesystem failure during read, write, create, or delete.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data-file line could not be parsed during recovery (no comma).
    #[error("malformed entry in {path}: {line:?}")]
    MalformedEntry { path: PathBuf, line: String },

    /// Write attempted on a table that is already Sealed, or a key/value
    /// violates the on-disk format's reserved characters.
    #[error("programmer error: {0}")]
    ProgrammerError(String),

    /// The table's backing store cannot grow further.
    #[error("capacity exceeded for table {table}: {reason}")]
    Capacity { table: String, reason: String },
}

impl SstableError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        SstableError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Whether a table still accepts writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    /// Accepts writes; at most one table per manager is Active.
    Active,
    /// Read-only; destroyed only by compaction.
    Sealed,
}

/// One on-disk table: data file, in-memory offset index, and membership
/// filter, plus the sidecar index file kept in sync on disk.
pub struct SSTable {
    name: String,
    data_path: PathBuf,
    index_path: PathBuf,
    index: HashMap<String, u64>,
    filter: Filter,
    creation_time: SystemTime,
    state: TableState,
}

impl SSTable {
    /// Creates a brand-new Active table named `name` in `dir`, with an empty
    /// data file, empty index sidecar, and a fresh membership filter sized
    /// by `filter_num_bits`/`filter_num_hashes`.
    pub fn create(
        dir: &Path,
        name: &str,
        filter_num_bits: u64,
        filter_num_hashes: u32,
    ) -> Result<Self, SstableError> {
        let data_path = dir.join(format!("{name}.sst"));
        let index_path = dir.join(format!("{name}.index"));

        File::create(&data_path).map_err(|e| SstableError::io(&data_path, e))?;
        File::create(&index_path).map_err(|e| SstableError::io(&index_path, e))?;

        let creation_time = std::fs::metadata(&data_path)
            .and_then(|m| m.modified())
            .map_err(|e| SstableError::io(&data_path, e))?;

        Ok(Self {
            name: name.to_string(),
            data_path,
            index_path,
            index: HashMap::new(),
            filter: Filter::with_params(filter_num_bits, filter_num_hashes),
            creation_time,
            state: TableState::Active,
        })
    }

    /// Reopens an existing `<name>.sst` file as a Sealed table, rebuilding
    /// the index and membership filter by streaming the data file.
    ///
    /// The index sidecar, if present, is ignored: the rebuilt index is the
    /// only source of truth, recording the offset of the *last* occurrence
    /// of each key. Lines without a comma are skipped as malformed entries
    /// and logged; recovery continues.
    pub fn recover(
        data_path: PathBuf,
        filter_num_bits: u64,
        filter_num_hashes: u32,
    ) -> Result<Self, SstableError> {
        let file = File::open(&data_path).map_err(|e| SstableError::io(&data_path, e))?;
        let creation_time = file
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| SstableError::io(&data_path, e))?;

        let mut reader = BufReader::new(file);
        let mut index = HashMap::new();
        let mut filter = Filter::with_params(filter_num_bits, filter_num_hashes);
        let mut offset: u64 = 0;
        let mut line = String::new();

        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| SstableError::io(&data_path, e))?;
            if read == 0 {
                break;
            }
            let trimmed = line.trim_end_matches('\n');
            match trimmed.split_once(',') {
                Some((key, _value)) => {
                    index.insert(key.to_string(), offset);
                    filter.add(key.as_bytes());
                }
                None => {
                    tracing::warn!(
                        path = %data_path.display(),
                        line = %trimmed,
                        "skipping malformed entry during recovery"
                    );
                }
            }
            offset += read as u64;
        }

        let name = data_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let index_path = data_path.with_extension("index");

        Ok(Self {
            name,
            data_path,
            index_path,
            index,
            filter,
            creation_time,
            state: TableState::Sealed,
        })
    }

    /// Appends `key,value\n` to the data file, updates the in-memory index
    /// and filter, then rewrites the index sidecar.
    ///
    /// Rejected with [`ProgrammerError`](SstableError::ProgrammerError) on a
    /// Sealed table, or if `key`/`value` contain a reserved character
    /// (comma or newline in the key, newline in the value).
    ///
    /// If the sidecar rewrite fails the write still succeeds: the in-memory
    /// index and data file are already correct, and startup recovery
    /// rebuilds the sidecar from the data file regardless.
    pub fn write(&mut self, key: &str, value: &str) -> Result<(), SstableError> {
        if self.state == TableState::Sealed {
            return Err(SstableError::ProgrammerError(format!(
                "write to sealed table {}",
                self.name
            )));
        }
        validate_key(key)?;
        validate_value(value)?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.data_path)
            .map_err(|e| SstableError::io(&self.data_path, e))?;
        let offset = file
            .metadata()
            .map_err(|e| SstableError::io(&self.data_path, e))?
            .len();

        let line = format!("{key},{value}\n");
        if let Err(e) = file.write_all(line.as_bytes()) {
            // Best-effort rollback: drop any partial bytes written.
            let _ = file.set_len(offset);
            return Err(self.capacity_or_io(e));
        }
        if let Err(e) = file.flush() {
            return Err(self.capacity_or_io(e));
        }

        self.index.insert(key.to_string(), offset);
        self.filter.add(key.as_bytes());

        if let Err(e) = self.rewrite_index() {
            tracing::warn!(table = %self.name, error = %e, "index sidecar rewrite failed, data file still authoritative");
        }

        Ok(())
    }

    /// Looks up `key`: consults the filter first, then the in-memory index,
    /// then seeks into the data file and verifies the stored key matches.
    ///
    /// A key whose filter and index both say "present" but whose on-disk
    /// line disagrees (a stale index entry) is treated as a miss and logged,
    /// per the index-mismatch error kind; it never fails the read.
    pub fn read(&self, key: &str) -> Result<Option<String>, SstableError> {
        if !self.filter.might_contain(key.as_bytes()) {
            return Ok(None);
        }
        let Some(&offset) = self.index.get(key) else {
            return Ok(None);
        };

        let mut file = File::open(&self.data_path).map_err(|e| SstableError::io(&self.data_path, e))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| SstableError::io(&self.data_path, e))?;

        let mut reader = BufReader::new(file);
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| SstableError::io(&self.data_path, e))?;
        let line = line.trim_end_matches('\n');

        match line.split_once(',') {
            Some((found_key, value)) if found_key == key => Ok(Some(value.to_string())),
            Some((found_key, _)) => {
                tracing::warn!(
                    table = %self.name,
                    expected = %key,
                    found = %found_key,
                    "index mismatch, treating as miss"
                );
                Ok(None)
            }
            None => {
                tracing::warn!(table = %self.name, %line, "malformed entry at indexed offset");
                Ok(None)
            }
        }
    }

    /// Removes both the data file and the index sidecar. Used only by
    /// compaction, once a table's surviving keys have been merged elsewhere.
    pub fn delete(self) -> Result<(), SstableError> {
        std::fs::remove_file(&self.data_path).map_err(|e| SstableError::io(&self.data_path, e))?;
        // The sidecar is advisory; its absence is not an error.
        let _ = std::fs::remove_file(&self.index_path);
        Ok(())
    }

    /// Marks the table Sealed. One-way: a Sealed table never becomes Active
    /// again.
    pub fn seal(&mut self) {
        self.state = TableState::Sealed;
    }

    /// Overrides the table's `creation_time`, used by compaction to place a
    /// merged table at the position its source tables occupied in the
    /// ordering, rather than at the position its own (newer) file mtime
    /// would imply.
    pub fn set_creation_time(&mut self, time: SystemTime) {
        self.creation_time = time;
    }

    /// Returns whether the filter believes `key` might be present, without
    /// touching the index or the data file.
    #[must_use]
    pub fn might_contain(&self, key: &str) -> bool {
        self.filter.might_contain(key.as_bytes())
    }

    /// Returns every key currently in the index, in unspecified order.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn creation_time(&self) -> SystemTime {
        self.creation_time
    }

    #[must_use]
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn state(&self) -> TableState {
        self.state
    }

    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    fn rewrite_index(&self) -> Result<(), SstableError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.index_path)
            .map_err(|e| SstableError::io(&self.index_path, e))?;
        for (key, offset) in &self.index {
            writeln!(file, "{key},{offset}").map_err(|e| SstableError::io(&self.index_path, e))?;
        }
        file.flush().map_err(|e| SstableError::io(&self.index_path, e))
    }

    /// Classifies a data-file write failure as [`SstableError::Capacity`]
    /// when it indicates the backing store cannot grow, falling back to
    /// the generic [`SstableError::Io`] otherwise.
    fn capacity_or_io(&self, source: std::io::Error) -> SstableError {
        if is_disk_full(&source) {
            SstableError::Capacity {
                table: self.name.clone(),
                reason: source.to_string(),
            }
        } else {
            SstableError::io(&self.data_path, source)
        }
    }
}

/// True for an `io::Error` that means "the filesystem is out of space",
/// across the portable `ErrorKind` and the POSIX `ENOSPC` errno.
fn is_disk_full(err: &std::io::Error) -> bool {
    if err.kind() == std::io::ErrorKind::StorageFull {
        return true;
    }
    matches!(err.raw_os_error(), Some(28))
}

fn validate_key(key: &str) -> Result<(), SstableError> {
    if key.is_empty() {
        return Err(SstableError::ProgrammerError("key must be non-empty".into()));
    }
    if key.contains(',') || key.contains('\n') {
        return Err(SstableError::ProgrammerError(format!(
            "key {key:?} contains a reserved character"
        )));
    }
    Ok(())
}

fn validate_value(value: &str) -> Result<(), SstableError> {
    if value.contains('\n') {
        return Err(SstableError::ProgrammerError(format!(
            "value {value:?} contains a reserved character"
        )));
    }
    Ok(())
}
