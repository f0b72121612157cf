//! In-memory ledger store for tests and ephemeral sessions.

use std::collections::HashMap;

use aura_primitives::PeerId;
use parking_lot::RwLock;

use crate::record::InteractionRecord;

use super::{LedgerStore, LedgerStoreError};

/// `HashMap`-backed store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    records: RwLock<HashMap<PeerId, InteractionRecord>>,
}

impl MemoryLedgerStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load_all(&self) -> Result<Vec<InteractionRecord>, LedgerStoreError> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn save(&self, record: &InteractionRecord) -> Result<(), LedgerStoreError> {
        self.records
            .write()
            .insert(record.peer_id.clone(), record.clone());
        Ok(())
    }

    fn remove(&self, peer_id: &PeerId) -> Result<(), LedgerStoreError> {
        self.records.write().remove(peer_id);
        Ok(())
    }

    fn clear(&self) -> Result<(), LedgerStoreError> {
        self.records.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Decision;

    fn test_record(n: u8) -> InteractionRecord {
        InteractionRecord {
            peer_id: PeerId::new(format!("peer-{n}")),
            decision: Decision::Liked,
            decided_at_ms: 1_000,
            profile: None,
        }
    }

    #[test]
    fn test_basic() {
        let store = MemoryLedgerStore::new();
        assert!(store.load_all().unwrap().is_empty());

        let record = test_record(1);
        store.save(&record).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![record.clone()]);

        store.remove(&record.peer_id).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites() {
        let store = MemoryLedgerStore::new();

        let mut record = test_record(1);
        store.save(&record).unwrap();

        record.decision = Decision::Passed;
        store.save(&record).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.first().unwrap().decision, Decision::Passed);
    }

    #[test]
    fn test_clear() {
        let store = MemoryLedgerStore::new();

        for n in 1..=5 {
            store.save(&test_record(n)).unwrap();
        }
        assert_eq!(store.load_all().unwrap().len(), 5);

        store.clear().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }
}
