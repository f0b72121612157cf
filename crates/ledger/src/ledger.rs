//! The interaction ledger.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use aura_primitives::{PeerId, Profile};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::record::{Decision, DecisionOutcome, InteractionRecord};
use crate::store::{LedgerStore, LedgerStoreError};

/// Ledger of like/pass/match decisions, keyed by peer id.
///
/// Owned by one discovery session; consumers read through the query methods.
/// With a store attached, records are loaded on construction and persisted on
/// every mutation, so decisions survive process restarts as well as scan
/// sessions. Persistence failures are logged and contained, never surfaced to
/// the decision path.
#[derive(Default)]
pub struct InteractionLedger {
    records: RwLock<HashMap<PeerId, InteractionRecord>>,
    store: Option<Arc<dyn LedgerStore>>,
}

impl std::fmt::Debug for InteractionLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionLedger")
            .field("records", &self.records.read().len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl InteractionLedger {
    /// Create an in-memory ledger without persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger backed by a store, loading all persisted records.
    pub fn with_store(store: Arc<dyn LedgerStore>) -> Result<Self, LedgerStoreError> {
        let records = store.load_all()?;
        let count = records.len();

        let map: HashMap<PeerId, InteractionRecord> = records
            .into_iter()
            .map(|record| (record.peer_id.clone(), record))
            .collect();

        if count > 0 {
            debug!(count, "loaded interaction records from store");
        }

        Ok(Self {
            records: RwLock::new(map),
            store: Some(store),
        })
    }

    /// Record that the local user liked a peer.
    ///
    /// No-op if the peer is already matched, so callers can suppress duplicate
    /// match evaluation. A supplied profile snapshot refreshes the retained
    /// one.
    pub fn like(
        &self,
        peer_id: PeerId,
        profile: Option<Profile>,
        now_ms: u64,
    ) -> DecisionOutcome {
        self.decide(peer_id, Decision::Liked, profile, now_ms)
    }

    /// Record that the local user passed on a peer. No-op once matched.
    pub fn pass(
        &self,
        peer_id: PeerId,
        profile: Option<Profile>,
        now_ms: u64,
    ) -> DecisionOutcome {
        self.decide(peer_id, Decision::Passed, profile, now_ms)
    }

    fn decide(
        &self,
        peer_id: PeerId,
        decision: Decision,
        profile: Option<Profile>,
        now_ms: u64,
    ) -> DecisionOutcome {
        let mut records = self.records.write();
        let record = match records.get_mut(&peer_id) {
            Some(existing) => {
                if existing.decision.is_terminal() {
                    return DecisionOutcome::AlreadyMatched;
                }
                existing.decision = decision;
                existing.decided_at_ms = now_ms;
                if profile.is_some() {
                    existing.profile = profile;
                }
                existing.clone()
            }
            None => {
                let record = InteractionRecord {
                    peer_id: peer_id.clone(),
                    decision,
                    decided_at_ms: now_ms,
                    profile,
                };
                records.insert(peer_id.clone(), record.clone());
                record
            }
        };
        drop(records);

        debug!(%peer_id, %decision, "decision recorded");
        self.persist(&record);
        DecisionOutcome::Recorded
    }

    /// Move a peer to the terminal matched state. Idempotent.
    ///
    /// Creates a record if the peer has none (a match confirmation can in
    /// principle arrive for a peer liked on another device).
    pub fn mark_matched(&self, peer_id: PeerId, now_ms: u64) {
        let mut records = self.records.write();
        let record = match records.get_mut(&peer_id) {
            Some(existing) => {
                if existing.decision.is_terminal() {
                    return;
                }
                existing.decision = Decision::Matched;
                existing.decided_at_ms = now_ms;
                existing.clone()
            }
            None => {
                let record = InteractionRecord {
                    peer_id: peer_id.clone(),
                    decision: Decision::Matched,
                    decided_at_ms: now_ms,
                    profile: None,
                };
                records.insert(peer_id.clone(), record.clone());
                record
            }
        };
        drop(records);

        debug!(%peer_id, "peer matched");
        self.persist(&record);
    }

    /// Forget a peer's decision so the peer can be offered again.
    ///
    /// Returns whether a record existed. Matched peers can be forgotten too;
    /// this is the unmatch path.
    pub fn forget(&self, peer_id: &PeerId) -> bool {
        let removed = self.records.write().remove(peer_id).is_some();
        if removed {
            debug!(%peer_id, "decision forgotten");
            if let Some(store) = &self.store {
                if let Err(e) = store.remove(peer_id) {
                    warn!(%peer_id, error = %e, "failed to remove persisted decision");
                }
            }
        }
        removed
    }

    /// Erase every decision, in memory and in the attached store.
    pub fn reset(&self) {
        self.records.write().clear();
        debug!("interaction ledger reset");
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, "failed to clear persisted decisions");
            }
        }
    }

    /// The current decision for a peer, if any.
    pub fn decision_for(&self, peer_id: &PeerId) -> Option<Decision> {
        self.records.read().get(peer_id).map(|r| r.decision)
    }

    /// The full record for a peer, if any.
    pub fn record_for(&self, peer_id: &PeerId) -> Option<InteractionRecord> {
        self.records.read().get(peer_id).cloned()
    }

    /// Ids of all liked peers.
    pub fn liked(&self) -> HashSet<PeerId> {
        self.ids_with(Decision::Liked)
    }

    /// Ids of all passed peers.
    pub fn passed(&self) -> HashSet<PeerId> {
        self.ids_with(Decision::Passed)
    }

    /// Ids of all matched peers.
    pub fn matched(&self) -> HashSet<PeerId> {
        self.ids_with(Decision::Matched)
    }

    /// Ids of every peer with any decision. Used for the "unseen" query.
    pub fn decided(&self) -> HashSet<PeerId> {
        self.records.read().keys().cloned().collect()
    }

    /// Number of recorded decisions.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if no decisions have been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Flush pending writes on the attached store, if any.
    pub fn flush(&self) -> Result<(), LedgerStoreError> {
        if let Some(store) = &self.store {
            store.flush()?;
        }
        Ok(())
    }

    fn ids_with(&self, decision: Decision) -> HashSet<PeerId> {
        self.records
            .read()
            .iter()
            .filter(|(_, record)| record.decision == decision)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn persist(&self, record: &InteractionRecord) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(record) {
                warn!(peer_id = %record.peer_id, error = %e, "failed to persist decision");
            }
        }
    }
}
