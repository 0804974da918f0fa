//! Asset registry: the in-memory form of a compiled table.
//!
//! A registry is built once from a table document, validated, and never
//! mutated afterwards. Records are shared via `Arc` so handles stay
//! cheap; the directory index keeps each directory's children in table
//! order.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, SystemTime};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{FsError, TableError};
use crate::handle::FileStat;
use crate::path;
use crate::table::{TableDoc, TableEntry};

/// One asset: immutable metadata plus the lazily decoded content.
#[derive(Debug)]
pub struct AssetRecord {
    pub(crate) path: String,
    pub(crate) name: String,
    pub(crate) local_source_path: String,
    pub(crate) declared_size: u64,
    pub(crate) mod_time_epoch_sec: i64,
    pub(crate) is_directory: bool,
    pub(crate) payload: Option<String>,
    pub(crate) content: OnceCell<Result<Arc<[u8]>, FsError>>,
    pub(crate) decode_attempts: AtomicU32,
}

impl AssetRecord {
    fn from_entry(entry: TableEntry) -> Result<Self, TableError> {
        if path::canonicalize(&entry.path) != entry.path {
            return Err(TableError::invalid(&entry.path, "path is not canonical"));
        }
        if entry.declared_size < 0 {
            return Err(TableError::invalid(&entry.path, "negative size"));
        }
        if entry.is_directory && entry.payload.is_some() {
            return Err(TableError::invalid(&entry.path, "directory carries a payload"));
        }
        if !entry.is_directory && entry.declared_size > 0 && entry.payload.is_none() {
            return Err(TableError::invalid(&entry.path, "missing payload"));
        }

        let name = path::base_name(&entry.path).to_string();
        Ok(Self {
            path: entry.path,
            name,
            local_source_path: entry.local_source_path,
            declared_size: entry.declared_size as u64,
            mod_time_epoch_sec: entry.mod_time_epoch_sec,
            is_directory: entry.is_directory,
            payload: entry.payload,
            content: OnceCell::new(),
            decode_attempts: AtomicU32::new(0),
        })
    }

    /// Canonical path of this asset.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base name (`/` for the root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative host path used in local mode.
    pub fn local_source_path(&self) -> &str {
        &self.local_source_path
    }

    /// Decompressed length recorded in the table.
    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Modification time recorded in the table.
    pub fn modified(&self) -> SystemTime {
        if self.mod_time_epoch_sec >= 0 {
            SystemTime::UNIX_EPOCH + Duration::from_secs(self.mod_time_epoch_sec as u64)
        } else {
            SystemTime::UNIX_EPOCH - Duration::from_secs(self.mod_time_epoch_sec.unsigned_abs())
        }
    }

    /// Metadata for this record as the embedded backend reports it.
    pub fn stat(&self) -> FileStat {
        FileStat {
            name: self.name.clone(),
            size: self.declared_size,
            modified: self.modified(),
            is_dir: self.is_directory,
        }
    }

    /// How many times the decode pipeline has run for this record.
    /// Stays at 0 until first materialization and never exceeds 1.
    pub fn decode_attempts(&self) -> u32 {
        self.decode_attempts.load(Ordering::Relaxed)
    }
}

/// Immutable path-keyed store over a compiled table.
#[derive(Debug)]
pub struct AssetRegistry {
    records: HashMap<String, Arc<AssetRecord>>,
    listings: HashMap<String, Vec<Arc<AssetRecord>>>,
}

impl AssetRegistry {
    /// Build a registry from a compiled table document.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Self::from_entries(TableDoc::parse(json)?.entries)
    }

    /// Build a registry from table entries, validating structure:
    /// unique canonical paths, a root directory, and a directory parent
    /// for every non-root entry.
    pub fn from_entries(entries: Vec<TableEntry>) -> Result<Self, TableError> {
        let mut records: HashMap<String, Arc<AssetRecord>> = HashMap::new();
        let mut order: Vec<Arc<AssetRecord>> = Vec::new();

        for entry in entries {
            let record = Arc::new(AssetRecord::from_entry(entry)?);
            let key = record.path.clone();
            if records.insert(key, record.clone()).is_some() {
                return Err(TableError::DuplicatePath(record.path.clone()));
            }
            order.push(record);
        }

        match records.get("/") {
            Some(root) if root.is_directory => {}
            _ => return Err(TableError::MissingRoot),
        }

        // Seed a listing for every directory, then attach children in
        // table order.
        let mut listings: HashMap<String, Vec<Arc<AssetRecord>>> = HashMap::new();
        for record in &order {
            if record.is_directory {
                listings.entry(record.path.clone()).or_default();
            }
        }
        for record in &order {
            let Some(parent) = path::parent(&record.path) else {
                continue;
            };
            match records.get(parent) {
                Some(p) if p.is_directory => {}
                Some(_) => {
                    return Err(TableError::invalid(&record.path, "parent is not a directory"));
                }
                None => return Err(TableError::invalid(&record.path, "parent not in table")),
            }
            listings.entry(parent.to_string()).or_default().push(record.clone());
        }

        debug!(assets = records.len(), "asset registry built");
        Ok(Self { records, listings })
    }

    /// Look up a record by canonical path.
    pub fn lookup(&self, canonical: &str) -> Option<&Arc<AssetRecord>> {
        self.records.get(canonical)
    }

    /// Number of records, the root included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Children of a directory in table order. `None` when the listing
    /// was never registered, which readdir reports as a build defect.
    pub(crate) fn listing(&self, canonical: &str) -> Option<&[Arc<AssetRecord>]> {
        self.listings.get(canonical).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub(crate) fn drop_listing(&mut self, canonical: &str) {
        self.listings.remove(canonical);
    }
}
