//! Sighting table with staleness eviction and range/sort queries.

use std::collections::{HashMap, HashSet};

use aura_primitives::{PeerId, Profile, ProfileError};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::sighting::{Sighting, UpsertOutcome};

/// Default maximum sighting age before the staleness sweep evicts it.
pub const DEFAULT_MAX_AGE_MS: u64 = 30_000;

/// The authoritative table of currently-visible peers, keyed by peer id.
///
/// All methods take `&self`; the map lives behind an `RwLock` so one session
/// can mutate while consumers run queries concurrently. Mutation order is the
/// session's responsibility (one event processed to completion at a time).
#[derive(Debug, Default)]
pub struct SightingStore {
    sightings: RwLock<HashMap<PeerId, Sighting>>,
}

impl SightingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh the sighting for a peer.
    ///
    /// The announced profile is validated first; a validation failure leaves
    /// the table untouched and is reported for diagnostics, never propagated
    /// to the user. On success the sighting is enriched with a distance
    /// estimate for `radius_m` and a compatibility score against
    /// `local_profile` (0 when no local profile is set).
    ///
    /// `first_seen_ms` is set only on insert; `last_seen_ms` never moves
    /// backwards even if the caller supplies an older `now_ms`.
    pub fn upsert(
        &self,
        profile: Profile,
        signal_strength: f64,
        radius_m: f64,
        local_profile: Option<&Profile>,
        now_ms: u64,
    ) -> Result<UpsertOutcome, ProfileError> {
        profile.validate()?;

        let distance_m = aura_signal::estimate_distance(signal_strength, radius_m);
        let compatibility = aura_score::compatibility_opt(local_profile, &profile);
        let peer_id = profile.id.clone();

        let mut sightings = self.sightings.write();
        match sightings.get_mut(&peer_id) {
            Some(existing) => {
                existing.profile = profile;
                existing.signal_strength = signal_strength;
                existing.distance_m = distance_m;
                existing.compatibility = compatibility;
                existing.last_seen_ms = existing.last_seen_ms.max(now_ms);
                trace!(%peer_id, distance_m, compatibility, "sighting refreshed");
                Ok(UpsertOutcome {
                    sighting: existing.clone(),
                    newly_visible: false,
                })
            }
            None => {
                let sighting = Sighting {
                    peer_id: peer_id.clone(),
                    profile,
                    signal_strength,
                    distance_m,
                    compatibility,
                    first_seen_ms: now_ms,
                    last_seen_ms: now_ms,
                };
                sightings.insert(peer_id.clone(), sighting.clone());
                debug!(%peer_id, distance_m, compatibility, "peer became visible");
                Ok(UpsertOutcome {
                    sighting,
                    newly_visible: true,
                })
            }
        }
    }

    /// Remove a peer's sighting. Returns whether it was present.
    pub fn remove(&self, peer_id: &PeerId) -> bool {
        let removed = self.sightings.write().remove(peer_id).is_some();
        if removed {
            debug!(%peer_id, "sighting removed");
        }
        removed
    }

    /// Evict every sighting not refreshed within `max_age_ms`.
    ///
    /// A sighting survives while `last_seen_ms >= now_ms - max_age_ms`.
    /// Returns the evicted peer ids so the caller can emit loss events.
    pub fn sweep_stale(&self, now_ms: u64, max_age_ms: u64) -> Vec<PeerId> {
        let cutoff = now_ms.saturating_sub(max_age_ms);

        let mut sightings = self.sightings.write();
        let stale: Vec<PeerId> = sightings
            .iter()
            .filter(|(_, sighting)| sighting.last_seen_ms < cutoff)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &stale {
            sightings.remove(id);
        }

        if !stale.is_empty() {
            debug!(count = stale.len(), "swept stale sightings");
        }
        stale
    }

    /// Empty the table. Used on session stop.
    pub fn clear(&self) {
        self.sightings.write().clear();
    }

    /// Number of currently-visible peers.
    pub fn len(&self) -> usize {
        self.sightings.read().len()
    }

    /// Returns true if no peers are visible.
    pub fn is_empty(&self) -> bool {
        self.sightings.read().is_empty()
    }

    /// Returns true if the peer is currently visible.
    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.sightings.read().contains_key(peer_id)
    }

    /// The current sighting for a peer, if visible.
    pub fn get(&self, peer_id: &PeerId) -> Option<Sighting> {
        self.sightings.read().get(peer_id).cloned()
    }

    /// All current sightings, in no particular order.
    pub fn all(&self) -> Vec<Sighting> {
        self.sightings.read().values().cloned().collect()
    }

    /// Sightings within `max_distance_m` (inclusive), closest first.
    pub fn within_distance(&self, max_distance_m: f64) -> Vec<Sighting> {
        let mut nearby: Vec<Sighting> = self
            .sightings
            .read()
            .values()
            .filter(|s| s.distance_m <= max_distance_m)
            .cloned()
            .collect();
        nearby.sort_by(|a, b| {
            a.distance_m
                .partial_cmp(&b.distance_m)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        nearby
    }

    /// All sightings sorted by compatibility, best first.
    pub fn by_compatibility(&self) -> Vec<Sighting> {
        let mut ranked = self.all();
        ranked.sort_by(|a, b| b.compatibility.cmp(&a.compatibility));
        ranked
    }

    /// Sightings whose peer id is not in the exclusion set.
    ///
    /// The session passes the ledger's decided set here to surface peers the
    /// user has not acted on yet.
    pub fn unseen(&self, exclude: &HashSet<PeerId>) -> Vec<Sighting> {
        self.sightings
            .read()
            .values()
            .filter(|s| !exclude.contains(&s.peer_id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_primitives::Availability;

    fn test_profile(id: &str) -> Profile {
        Profile::new(id, id, 30, ["music"], Availability::Now)
    }

    fn test_local() -> Profile {
        test_profile("local")
    }

    #[test]
    fn test_upsert_insert_then_update() {
        let store = SightingStore::new();
        let local = test_local();

        let first = store
            .upsert(test_profile("a"), 80.0, 10.0, Some(&local), 1_000)
            .unwrap();
        assert!(first.newly_visible);
        assert_eq!(first.sighting.first_seen_ms, 1_000);
        assert_eq!(first.sighting.last_seen_ms, 1_000);

        let second = store
            .upsert(test_profile("a"), 60.0, 10.0, Some(&local), 5_000)
            .unwrap();
        assert!(!second.newly_visible);
        assert_eq!(second.sighting.first_seen_ms, 1_000);
        assert_eq!(second.sighting.last_seen_ms, 5_000);
        assert_eq!(store.len(), 1);

        // Weaker signal moved the estimate out.
        assert!(second.sighting.distance_m > first.sighting.distance_m);
    }

    #[test]
    fn test_last_seen_is_monotone() {
        let store = SightingStore::new();
        store
            .upsert(test_profile("a"), 80.0, 10.0, None, 5_000)
            .unwrap();
        // An out-of-order event must not rewind last_seen.
        let outcome = store
            .upsert(test_profile("a"), 80.0, 10.0, None, 4_000)
            .unwrap();
        assert_eq!(outcome.sighting.last_seen_ms, 5_000);
    }

    #[test]
    fn test_invalid_profile_rejected_without_state_change() {
        let store = SightingStore::new();
        let underage = Profile::new("a", "a", 17, ["music"], Availability::Now);
        let err = store
            .upsert(underage, 80.0, 10.0, None, 1_000)
            .unwrap_err();
        assert_eq!(err, ProfileError::AgeOutOfRange(17));
        assert!(store.is_empty());
    }

    #[test]
    fn test_compatibility_zero_without_local_profile() {
        let store = SightingStore::new();
        let outcome = store
            .upsert(test_profile("a"), 80.0, 10.0, None, 1_000)
            .unwrap();
        assert_eq!(outcome.sighting.compatibility, 0);
    }

    #[test]
    fn test_remove() {
        let store = SightingStore::new();
        store
            .upsert(test_profile("a"), 80.0, 10.0, None, 1_000)
            .unwrap();

        assert!(store.remove(&PeerId::new("a")));
        assert!(!store.remove(&PeerId::new("a")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_sweep_stale_boundary() {
        let store = SightingStore::new();
        let now = 100_000;

        store
            .upsert(test_profile("stale"), 80.0, 10.0, None, now - 30_001)
            .unwrap();
        store
            .upsert(test_profile("fresh"), 80.0, 10.0, None, now - 29_999)
            .unwrap();

        let evicted = store.sweep_stale(now, DEFAULT_MAX_AGE_MS);
        assert_eq!(evicted, vec![PeerId::new("stale")]);
        assert!(store.contains(&PeerId::new("fresh")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_within_distance_sorted_and_inclusive() {
        let store = SightingStore::new();
        let local = test_local();
        // Stronger signal = closer.
        for (id, signal) in [("far", 35.0), ("near", 95.0), ("mid", 65.0)] {
            store
                .upsert(test_profile(id), signal, 10.0, Some(&local), 1_000)
                .unwrap();
        }

        let all = store.within_distance(10.0);
        let order: Vec<&str> = all.iter().map(|s| s.peer_id.as_str()).collect();
        assert_eq!(order, vec!["near", "mid", "far"]);

        // Inclusive bound: query exactly at the farthest peer's distance.
        let far = store.get(&PeerId::new("far")).unwrap();
        let within = store.within_distance(far.distance_m);
        assert_eq!(within.len(), 3);
        let tighter = store.within_distance(far.distance_m - 0.01);
        assert_eq!(tighter.len(), 2);
    }

    #[test]
    fn test_by_compatibility_descending() {
        let store = SightingStore::new();
        let local = Profile::new(
            "local",
            "local",
            30,
            ["music", "travel"],
            Availability::Now,
        );

        let close_match = Profile::new(
            "close",
            "close",
            30,
            ["music", "travel"],
            Availability::Now,
        );
        let weak_match = Profile::new("weak", "weak", 45, ["chess"], Availability::Weekend);
        store
            .upsert(weak_match, 80.0, 10.0, Some(&local), 1_000)
            .unwrap();
        store
            .upsert(close_match, 80.0, 10.0, Some(&local), 1_000)
            .unwrap();

        let ranked = store.by_compatibility();
        assert_eq!(ranked[0].peer_id, PeerId::new("close"));
        assert!(ranked[0].compatibility > ranked[1].compatibility);
    }

    #[test]
    fn test_unseen_excludes_decided_peers() {
        let store = SightingStore::new();
        for id in ["a", "b", "c"] {
            store
                .upsert(test_profile(id), 80.0, 10.0, None, 1_000)
                .unwrap();
        }

        let decided: HashSet<PeerId> = [PeerId::new("a"), PeerId::new("c")].into();
        let unseen = store.unseen(&decided);
        assert_eq!(unseen.len(), 1);
        assert_eq!(unseen[0].peer_id, PeerId::new("b"));
    }

    #[test]
    fn test_clear() {
        let store = SightingStore::new();
        store
            .upsert(test_profile("a"), 80.0, 10.0, None, 1_000)
            .unwrap();
        store.clear();
        assert!(store.is_empty());
    }
}
