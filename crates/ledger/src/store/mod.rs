//! Decision persistence trait and implementations (memory, file).

mod file;
mod memory;

use auto_impl::auto_impl;
use aura_primitives::PeerId;
use thiserror::Error;

use crate::record::InteractionRecord;

pub use file::FileLedgerStore;
pub use memory::MemoryLedgerStore;

/// Error type for ledger store operations.
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    /// IO error during storage operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Storage backend specific error.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Decision persistence trait with auto-impl for &, Box, Arc.
///
/// The engine treats the backing store as an opaque key-value surface; any
/// backend that can round-trip [`InteractionRecord`]s works.
#[auto_impl(&, Box, Arc)]
pub trait LedgerStore: Send + Sync {
    /// Load all persisted records. Called once on ledger construction.
    fn load_all(&self) -> Result<Vec<InteractionRecord>, LedgerStoreError>;

    /// Save a single record, replacing any existing one for the same peer.
    fn save(&self, record: &InteractionRecord) -> Result<(), LedgerStoreError>;

    /// Remove a record from storage.
    fn remove(&self, peer_id: &PeerId) -> Result<(), LedgerStoreError>;

    /// Remove all records.
    fn clear(&self) -> Result<(), LedgerStoreError>;

    /// Flush any buffered writes to persistent storage.
    fn flush(&self) -> Result<(), LedgerStoreError> {
        Ok(())
    }
}
