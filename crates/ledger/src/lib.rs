//! Like/pass/match decision ledger.
//!
//! Decisions survive scan sessions: a sighting being evicted does not erase
//! what the user already decided about that peer. The ledger therefore keeps
//! its own profile snapshots and supports pluggable persistence through
//! [`LedgerStore`], with in-memory and JSON-file backends included.

mod ledger;
mod record;
mod store;

pub use ledger::InteractionLedger;
pub use record::{Decision, DecisionOutcome, InteractionRecord};
pub use store::{FileLedgerStore, LedgerStore, LedgerStoreError, MemoryLedgerStore};
