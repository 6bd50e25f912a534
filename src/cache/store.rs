//! Durable identifier → [`DocRecord`] store backed by a single JSON file.
//!
//! The file is a flat object keyed by normalized identifier:
//!
//! ```json
//! {
//!   "CloseHandle": {
//!     "syntax": "BOOL CloseHandle(\n  [in] HANDLE hObject\n);",
//!     "return_value": "If the function succeeds, the return value is nonzero.",
//!     "fetched_at": "2026-10-19T08:00:00Z",
//!     "found": true
//!   },
//!   "NoSuchFunction123": { "found": false }
//! }
//! ```
//!
//! # Failure policy
//!
//! Loading never fails: a missing file is an empty cache, and an unreadable
//! or corrupt file is logged and treated as an empty cache. Writes replace
//! the whole file atomically (tmp + rename). A failed write is returned to
//! the caller but the in-memory entry is kept for the rest of the session.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::types::DocRecord;
use crate::{Result, WindocError};

/// Load cache entries from disk.
///
/// Returns an empty map on a missing file, and on an unreadable or corrupt
/// one (logging a warning). Individual malformed entries are skipped.
pub fn load(path: &Path) -> HashMap<String, DocRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read doc cache, starting cold");
            return HashMap::new();
        }
    };

    let raw: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(&content) {
        Ok(map) => map,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt doc cache, starting cold");
            return HashMap::new();
        }
    };

    let mut entries = HashMap::with_capacity(raw.len());
    for (identifier, value) in raw {
        match serde_json::from_value::<DocRecord>(value) {
            Ok(mut record) => {
                record.identifier = identifier.clone();
                entries.insert(identifier, record);
            }
            Err(e) => {
                warn!(path = %path.display(), %identifier, error = %e, "skipping malformed cache entry");
            }
        }
    }
    debug!(path = %path.display(), count = entries.len(), "loaded doc cache");
    entries
}

/// Write entries to `path`, atomically via a sibling tmp file.
///
/// Keys are written in sorted order so the file stays diffable.
fn save(path: &Path, entries: &HashMap<String, DocRecord>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            WindocError::CacheWrite(format!(
                "failed to create cache dir {}: {e}",
                parent.display()
            ))
        })?;
    }

    let sorted: BTreeMap<&str, &DocRecord> =
        entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
    let json = serde_json::to_string_pretty(&sorted)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json).map_err(|e| {
        WindocError::CacheWrite(format!(
            "failed to write cache file {}: {e}",
            tmp_path.display()
        ))
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        // Best effort: don't leave the tmp file behind.
        let _ = std::fs::remove_file(&tmp_path);
        WindocError::CacheWrite(format!(
            "failed to rename cache file {} → {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;

    Ok(())
}

/// Thread-safe documentation cache persisted to one JSON file.
///
/// Reads are served from memory. Every mutation takes the writer lock,
/// updates the map and rewrites the file before releasing it, so the file
/// always reflects the latest committed state and concurrent `put`s can't
/// interleave their writes.
pub struct CacheStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, DocRecord>>,
    writer: Mutex<()>,
}

impl CacheStore {
    /// Open the store at `path`, loading any existing entries.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load(&path);
        Self {
            path,
            entries: RwLock::new(entries),
            writer: Mutex::new(()),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a record by (already normalized) identifier.
    pub fn get(&self, identifier: &str) -> Option<DocRecord> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
    }

    /// Whether an entry exists for the identifier.
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(identifier)
    }

    /// Insert or replace a record, then persist the whole map.
    ///
    /// On a write error the record stays in memory.
    pub fn put(&self, record: DocRecord) -> Result<()> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.identifier.clone(), record);
        self.persist()
    }

    /// Remove a single entry. Returns whether it existed.
    pub fn remove(&self, identifier: &str) -> Result<bool> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identifier)
            .is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Drop every entry and persist the empty cache.
    pub fn clear(&self) -> Result<()> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.persist()
    }

    /// Number of cached identifiers (positive and negative).
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all records, sorted by identifier.
    pub fn entries(&self) -> Vec<DocRecord> {
        let mut records: Vec<DocRecord> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        records.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        records
    }

    // Caller must hold `self.writer`.
    fn persist(&self) -> Result<()> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        save(&self.path, &entries)
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}
