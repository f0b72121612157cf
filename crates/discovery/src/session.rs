//! The discovery session state machine.

use std::sync::Arc;

use aura_ledger::{DecisionOutcome, InteractionLedger};
use aura_primitives::{PeerId, Profile};
use aura_sightings::{Sighting, SightingStore};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::events::{DiscoveryEvent, EventEmitter};
use crate::oracle::{CoinFlipOracle, MatchOracle};

/// Whether the session is currently scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    /// Not scanning. Sightings and losses are ignored.
    Idle,
    /// Scanning. Sightings are ingested and the sweep runs.
    Active,
}

impl SessionState {
    /// True if scanning.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Result of [`DiscoverySession::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Scanning began and the sighting table was reset.
    Started,
    /// Already scanning. Radius unchanged, table untouched.
    AlreadyActive,
}

/// Result of [`DiscoverySession::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Scanning stopped and the sighting table was cleared.
    Stopped,
    /// Was not scanning.
    AlreadyIdle,
}

/// Result of [`DiscoverySession::record_like`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// Like recorded, not (yet) reciprocated.
    Liked,
    /// Like recorded and reciprocated. A match event was emitted.
    Matched,
    /// Peer was already matched. Nothing changed.
    AlreadyMatched,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    radius_m: f64,
}

/// Orchestrates one local user's discovery lifecycle.
///
/// Owns the sighting table and interaction ledger, gates ingestion on the
/// session state, and broadcasts [`DiscoveryEvent`]s. All methods take
/// `&self` and are safe to call concurrently; timestamps are supplied by the
/// caller so behavior is reproducible under test.
pub struct DiscoverySession {
    local_id: PeerId,
    local_profile: RwLock<Option<Profile>>,
    sightings: Arc<SightingStore>,
    ledger: Arc<InteractionLedger>,
    oracle: Box<dyn MatchOracle>,
    config: DiscoveryConfig,
    inner: RwLock<SessionInner>,
    events: EventEmitter,
}

impl std::fmt::Debug for DiscoverySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("DiscoverySession")
            .field("local_id", &self.local_id)
            .field("state", &inner.state)
            .field("radius_m", &inner.radius_m)
            .field("sightings", &self.sightings.len())
            .field("ledger", &self.ledger.len())
            .finish()
    }
}

impl DiscoverySession {
    /// Create a session with the default coin-flip oracle from
    /// `config.match_probability`.
    pub fn new(
        local_id: PeerId,
        sightings: Arc<SightingStore>,
        ledger: Arc<InteractionLedger>,
        config: DiscoveryConfig,
    ) -> Self {
        let oracle = Box::new(CoinFlipOracle::new(config.match_probability));
        Self::with_oracle(local_id, sightings, ledger, oracle, config)
    }

    /// Create a session with a custom match oracle.
    pub fn with_oracle(
        local_id: PeerId,
        sightings: Arc<SightingStore>,
        ledger: Arc<InteractionLedger>,
        oracle: Box<dyn MatchOracle>,
        config: DiscoveryConfig,
    ) -> Self {
        let events = EventEmitter::new(config.event_channel_capacity);
        let inner = SessionInner {
            state: SessionState::Idle,
            radius_m: config.default_radius_m,
        };

        Self {
            local_id,
            local_profile: RwLock::new(None),
            sightings,
            ledger,
            oracle,
            config,
            inner: RwLock::new(inner),
            events,
        }
    }

    /// The local user's peer id.
    pub fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    /// Set or replace the local user's own profile, used as the reference
    /// side of compatibility scoring for incoming sightings.
    pub fn set_local_profile(&self, profile: Option<Profile>) {
        *self.local_profile.write() = profile;
    }

    /// The local user's current profile, if one is set.
    pub fn local_profile(&self) -> Option<Profile> {
        self.local_profile.read().clone()
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.inner.read().state
    }

    /// Current scan radius in meters.
    pub fn radius_m(&self) -> f64 {
        self.inner.read().radius_m
    }

    /// The session configuration.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// The sighting table.
    pub fn sightings(&self) -> &Arc<SightingStore> {
        &self.sightings
    }

    /// The interaction ledger.
    pub fn ledger(&self) -> &Arc<InteractionLedger> {
        &self.ledger
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<DiscoveryEvent> {
        self.events.subscribe()
    }

    /// Begin scanning with the given radius.
    ///
    /// Resets the sighting table so a new session never shows peers from a
    /// previous one. Starting while already active changes nothing, not even
    /// the radius.
    pub fn start(&self, radius_m: f64) -> Result<StartOutcome, DiscoveryError> {
        {
            let mut inner = self.inner.write();
            if inner.state.is_active() {
                debug!(radius_m, "start ignored, session already active");
                return Ok(StartOutcome::AlreadyActive);
            }
            if !aura_signal::radius_in_bounds(radius_m) {
                return Err(DiscoveryError::InvalidRadius { radius_m });
            }

            // Still idle here, so no ingestion can race the reset.
            self.sightings.clear();
            inner.radius_m = radius_m;
            inner.state = SessionState::Active;
        }

        debug!(radius_m, "discovery session started");
        self.events.emit(DiscoveryEvent::SessionStarted { radius_m });
        Ok(StartOutcome::Started)
    }

    /// Begin scanning with the configured default radius.
    pub fn start_default(&self) -> Result<StartOutcome, DiscoveryError> {
        self.start(self.config.default_radius_m)
    }

    /// Stop scanning and clear the sighting table.
    ///
    /// The state flip and the clear happen under the same lock that gates
    /// ingestion, so an in-flight transport event either lands before the
    /// clear or sees the session idle; it can never repopulate the table
    /// afterwards. The ledger is untouched.
    pub fn stop(&self) -> StopOutcome {
        {
            let mut inner = self.inner.write();
            if !inner.state.is_active() {
                debug!("stop ignored, session already idle");
                return StopOutcome::AlreadyIdle;
            }
            inner.state = SessionState::Idle;
            self.sightings.clear();
        }

        debug!("discovery session stopped");
        self.events.emit(DiscoveryEvent::SessionStopped);
        StopOutcome::Stopped
    }

    /// Change the scan radius without restarting.
    ///
    /// Takes effect for subsequent sightings; existing distance estimates are
    /// not recomputed. Allowed in any state.
    pub fn set_radius(&self, radius_m: f64) -> Result<(), DiscoveryError> {
        if !aura_signal::radius_in_bounds(radius_m) {
            return Err(DiscoveryError::InvalidRadius { radius_m });
        }
        self.inner.write().radius_m = radius_m;
        debug!(radius_m, "scan radius updated");
        Ok(())
    }

    /// Ingest one transport sighting.
    ///
    /// Ignored while idle. Invalid profiles are dropped with a
    /// [`DiscoveryEvent::SightingRejected`]; valid ones are enriched and
    /// stored, emitting [`DiscoveryEvent::PeerVisible`].
    pub fn handle_sighting(&self, profile: Profile, signal_strength: f64, now_ms: u64) {
        // The guard is held across the upsert: a concurrent stop() cannot
        // slip its clear between the state check and the insert.
        let inner = self.inner.read();
        if !inner.state.is_active() {
            trace!(peer_id = %profile.id, "sighting ignored, session idle");
            return;
        }
        let radius_m = inner.radius_m;

        let peer_id = profile.id.clone();
        let local = self.local_profile.read().clone();

        let result = self
            .sightings
            .upsert(profile, signal_strength, radius_m, local.as_ref(), now_ms);
        drop(inner);

        match result {
            Ok(outcome) => {
                self.events.emit(DiscoveryEvent::PeerVisible {
                    sighting: outcome.sighting,
                    newly_visible: outcome.newly_visible,
                });
            }
            Err(reason) => {
                warn!(peer_id = %peer_id, %reason, "rejected sighting with invalid profile");
                self.events
                    .emit(DiscoveryEvent::SightingRejected { peer_id, reason });
            }
        }
    }

    /// Handle an explicit transport-level peer loss.
    ///
    /// Ignored while idle or when the peer is not in the table.
    pub fn handle_loss(&self, peer_id: &PeerId) {
        let inner = self.inner.read();
        if !inner.state.is_active() {
            trace!(%peer_id, "loss ignored, session idle");
            return;
        }

        let removed = self.sightings.remove(peer_id);
        drop(inner);

        if removed {
            debug!(%peer_id, "peer lost");
            self.events.emit(DiscoveryEvent::PeerLost {
                peer_id: peer_id.clone(),
            });
        }
    }

    /// Evict sightings older than the configured staleness window, emitting
    /// [`DiscoveryEvent::PeerLost`] for each. No-op while idle.
    pub fn sweep(&self, now_ms: u64) {
        let inner = self.inner.read();
        if !inner.state.is_active() {
            return;
        }

        let evicted = self.sightings.sweep_stale(now_ms, self.config.stale_after_ms);
        drop(inner);

        for peer_id in evicted {
            self.events.emit(DiscoveryEvent::PeerLost { peer_id });
        }
    }

    /// Record that the local user liked `peer_id`, then consult the oracle.
    ///
    /// A reciprocated like promotes the record to matched and emits
    /// [`DiscoveryEvent::Matched`]. Liking an already-matched peer changes
    /// nothing. Decisions are accepted in any session state; the ledger
    /// outlives the scan.
    pub fn record_like(&self, peer_id: &PeerId, now_ms: u64) -> LikeOutcome {
        let snapshot = self.sightings.get(peer_id).map(|s| s.profile);

        match self.ledger.like(peer_id.clone(), snapshot, now_ms) {
            DecisionOutcome::AlreadyMatched => LikeOutcome::AlreadyMatched,
            DecisionOutcome::Recorded => {
                if !self.oracle.mutual_like(&self.local_id, peer_id) {
                    return LikeOutcome::Liked;
                }

                self.ledger.mark_matched(peer_id.clone(), now_ms);
                debug!(%peer_id, "mutual like confirmed");

                let sighting = self.sightings.get(peer_id);
                let profile = sighting
                    .as_ref()
                    .map(|s| s.profile.clone())
                    .or_else(|| self.ledger.record_for(peer_id).and_then(|r| r.profile));

                self.events.emit(DiscoveryEvent::Matched {
                    peer_id: peer_id.clone(),
                    sighting,
                    profile,
                });
                LikeOutcome::Matched
            }
        }
    }

    /// Record that the local user passed on `peer_id`.
    ///
    /// Returns true if the decision was recorded, false if the peer was
    /// already matched. Matches are never downgraded to passes.
    pub fn record_pass(&self, peer_id: &PeerId, now_ms: u64) -> bool {
        let snapshot = self.sightings.get(peer_id).map(|s| s.profile);
        !self
            .ledger
            .pass(peer_id.clone(), snapshot, now_ms)
            .already_matched()
    }

    /// All currently visible peers, in no particular order.
    pub fn visible_peers(&self) -> Vec<Sighting> {
        self.sightings.all()
    }

    /// Visible peers within `max_distance_m`, closest first. `None` uses the
    /// current scan radius.
    pub fn peers_within(&self, max_distance_m: Option<f64>) -> Vec<Sighting> {
        let max = max_distance_m.unwrap_or_else(|| self.radius_m());
        self.sightings.within_distance(max)
    }

    /// All visible peers, highest compatibility first.
    pub fn peers_by_compatibility(&self) -> Vec<Sighting> {
        self.sightings.by_compatibility()
    }

    /// Visible peers the local user has not yet decided on, the swipe queue.
    pub fn undecided_peers(&self) -> Vec<Sighting> {
        self.sightings.unseen(&self.ledger.decided())
    }

    /// The recorded decision for a peer, if any.
    pub fn decision_for(&self, peer_id: &PeerId) -> Option<aura_ledger::Decision> {
        self.ledger.decision_for(peer_id)
    }

    /// Flush the ledger to its backing store, if any.
    pub fn flush(&self) -> Result<(), DiscoveryError> {
        self.ledger.flush()?;
        Ok(())
    }
}
