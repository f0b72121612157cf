//! JSON file-based ledger store with atomic writes.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use aura_primitives::PeerId;
use parking_lot::{Mutex, RwLock};

use crate::record::InteractionRecord;

use super::{LedgerStore, LedgerStoreError};

/// JSON file store. Loaded to memory on startup, written back on flush.
///
/// Writes go to a `.tmp` sibling first and are renamed into place, so a crash
/// mid-write never corrupts the ledger file.
pub struct FileLedgerStore {
    path: PathBuf,
    records: RwLock<HashMap<PeerId, InteractionRecord>>,
    dirty: Mutex<bool>,
}

impl std::fmt::Debug for FileLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLedgerStore")
            .field("path", &self.path)
            .field("count", &self.records.read().len())
            .field("dirty", &*self.dirty.lock())
            .finish()
    }
}

impl FileLedgerStore {
    /// Load existing file or create an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, LedgerStoreError> {
        let path = path.into();
        let records = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
            dirty: Mutex::new(false),
        })
    }

    /// Create the store, making parent directories if needed.
    pub fn new_with_create_dir(path: impl Into<PathBuf>) -> Result<Self, LedgerStoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::new(path)
    }

    fn load_from_file(path: &PathBuf) -> Result<HashMap<PeerId, InteractionRecord>, LedgerStoreError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let records: Vec<InteractionRecord> = serde_json::from_reader(reader)
            .map_err(|e| LedgerStoreError::Serialization(e.to_string()))?;

        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            map.insert(record.peer_id.clone(), record);
        }

        Ok(map)
    }

    fn save_to_file(&self) -> Result<(), LedgerStoreError> {
        let records = self.records.read();
        let snapshot: Vec<&InteractionRecord> = records.values().collect();

        // Write to temp file first, then rename (atomic)
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &snapshot)
                .map_err(|e| LedgerStoreError::Serialization(e.to_string()))?;
        }

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn mark_dirty(&self) {
        *self.dirty.lock() = true;
    }

    /// Returns true if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        *self.dirty.lock()
    }

    /// The backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LedgerStore for FileLedgerStore {
    fn load_all(&self) -> Result<Vec<InteractionRecord>, LedgerStoreError> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn save(&self, record: &InteractionRecord) -> Result<(), LedgerStoreError> {
        self.records
            .write()
            .insert(record.peer_id.clone(), record.clone());
        self.mark_dirty();
        Ok(())
    }

    fn remove(&self, peer_id: &PeerId) -> Result<(), LedgerStoreError> {
        self.records.write().remove(peer_id);
        self.mark_dirty();
        Ok(())
    }

    fn clear(&self) -> Result<(), LedgerStoreError> {
        self.records.write().clear();
        self.mark_dirty();
        Ok(())
    }

    fn flush(&self) -> Result<(), LedgerStoreError> {
        if self.is_dirty() {
            self.save_to_file()?;
            *self.dirty.lock() = false;
        }
        Ok(())
    }
}

impl Drop for FileLedgerStore {
    fn drop(&mut self) {
        // Best-effort flush on drop
        if self.is_dirty() {
            let _ = self.save_to_file();
        }
    }
}
