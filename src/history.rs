//! Persistent translation history.
//!
//! Records are `"<query>-><brief>"` strings kept oldest first and written
//! through to `<user-data-dir>/rofi/rofi_ts_history` after every mutation,
//! one record per line.

use crate::error::HistoryError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Separator between the query and the brief translation in a record.
pub const RECORD_SEPARATOR: &str = "->";

/// Build a history record from a query and its brief translation.
pub fn format_record(input: &str, brief: &str) -> String {
    format!("{input}{RECORD_SEPARATOR}{brief}")
}

/// Bounded, write-through history log.
#[derive(Debug)]
pub struct History {
    entries: Vec<String>,
    max_entries: usize,
    path: PathBuf,
    /// Cleared when the file exists but could not be read; it is then
    /// never overwritten.
    writable: bool,
}

impl History {
    /// Create an empty history persisted at `path`.
    pub fn new(path: PathBuf, max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
            path,
            writable: true,
        }
    }

    /// Empty in-memory history for a file that failed to load.
    ///
    /// Records can still be added and removed, but [`History::save`]
    /// refuses to touch the file.
    pub fn read_only(path: PathBuf, max_entries: usize) -> Self {
        Self {
            writable: false,
            ..Self::new(path, max_entries)
        }
    }

    /// Load the history stored at `path`.
    ///
    /// A missing file yields an empty history. When the file holds more
    /// records than `max_entries`, only the newest are kept. Invalid UTF-8
    /// is replaced rather than rejected.
    pub fn load(path: PathBuf, max_entries: usize) -> Result<Self, HistoryError> {
        let mut history = Self::new(path, max_entries);
        let bytes = match fs::read(&history.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No history at {:?}", history.path);
                return Ok(history);
            }
            Err(source) => {
                return Err(HistoryError::Read {
                    path: history.path.clone(),
                    source,
                });
            }
        };

        let contents = String::from_utf8_lossy(&bytes);
        let contents = contents.trim();
        if !contents.is_empty() {
            history.entries = contents.split('\n').map(str::to_string).collect();
        }
        history.truncate();
        log::info!("Loaded {} history entries", history.entries.len());
        Ok(history)
    }

    /// Append a record, evicting the oldest one when full, then persist.
    pub fn append(&mut self, record: String) -> Result<(), HistoryError> {
        if self.entries.len() >= self.max_entries {
            self.entries.remove(0);
        }
        self.entries.push(record);
        self.save()
    }

    /// Remove the record at `index` (oldest first), then persist.
    pub fn remove_at(&mut self, index: usize) -> Result<String, HistoryError> {
        if index >= self.entries.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Write all records to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<(), HistoryError> {
        if !self.writable {
            return Err(HistoryError::ReadOnly {
                path: self.path.clone(),
            });
        }
        let write_err = |source| HistoryError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let contents = self.entries.join("\n");
        fs::write(&self.path, contents.trim()).map_err(write_err)?;
        log::debug!("Saved {} history entries", self.entries.len());
        Ok(())
    }

    /// Record at `index` (oldest first).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// All records, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Get number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity of the log.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Whether mutations are written back to the file.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Location of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn truncate(&mut self) {
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }
}
