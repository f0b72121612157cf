//! Sighting record.

use aura_primitives::{PeerId, Profile};
use serde::{Deserialize, Serialize};

/// Enriched, time-stamped record of a currently-visible peer.
///
/// Created on the first sighting event for a peer id and updated in place on
/// every subsequent one. `first_seen_ms` is immutable after creation;
/// `last_seen_ms` is monotone non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    /// The sighted peer's identifier.
    pub peer_id: PeerId,
    /// Profile snapshot announced with the sighting.
    pub profile: Profile,
    /// Raw signal-strength sample, 0-100.
    pub signal_strength: f64,
    /// Distance estimate in meters, derived from the signal sample.
    pub distance_m: f64,
    /// Compatibility against the local profile, 0-100.
    pub compatibility: u8,
    /// Unix millis when this peer first became visible.
    pub first_seen_ms: u64,
    /// Unix millis of the most recent sighting event.
    pub last_seen_ms: u64,
}

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    /// The sighting as stored after the upsert.
    pub sighting: Sighting,
    /// True if the peer id was absent before this call.
    pub newly_visible: bool,
}
