//! Decision record types.

use aura_primitives::{PeerId, Profile};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The user's decision about a peer.
///
/// `Liked` and `Passed` overwrite each other; `Matched` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The local user liked this peer.
    Liked,
    /// The local user passed on this peer.
    Passed,
    /// Both sides liked each other. Terminal.
    Matched,
}

impl Decision {
    /// Returns true for the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Decision::Matched)
    }
}

/// One persisted decision about a peer. At most one record per peer id.
///
/// The profile snapshot is the last one seen when the decision was recorded,
/// retained so a match can still be announced after the sighting itself has
/// been evicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// The decided-about peer.
    pub peer_id: PeerId,
    /// The current decision.
    pub decision: Decision,
    /// Unix millis of the most recent decision change.
    pub decided_at_ms: u64,
    /// Last known profile snapshot, if any sighting carried one.
    pub profile: Option<Profile>,
}

/// Whether a like/pass call changed the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The decision was recorded (or overwrote the opposite one).
    Recorded,
    /// The peer is already matched; the call was a no-op.
    AlreadyMatched,
}

impl DecisionOutcome {
    /// Returns true if the peer was already in the terminal state.
    pub fn already_matched(&self) -> bool {
        matches!(self, DecisionOutcome::AlreadyMatched)
    }
}
