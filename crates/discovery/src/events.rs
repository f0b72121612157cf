//! Discovery event broadcasting.

use aura_primitives::{PeerId, Profile, ProfileError};
use aura_sightings::Sighting;
use tokio::sync::broadcast;
use tracing::trace;

/// Events emitted by a discovery session.
///
/// Subscribers receive every event emitted after they subscribe; slow
/// subscribers see [`broadcast::error::RecvError::Lagged`] rather than
/// blocking the session.
#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    /// Scanning started with the given radius.
    SessionStarted {
        /// Active scan radius in meters.
        radius_m: f64,
    },
    /// Scanning stopped and the sighting table was cleared.
    SessionStopped,
    /// A peer was sighted or refreshed.
    PeerVisible {
        /// Enriched sighting as stored.
        sighting: Sighting,
        /// True on first appearance, false on refresh.
        newly_visible: bool,
    },
    /// A peer left range, by explicit loss or staleness sweep.
    PeerLost {
        /// The departed peer.
        peer_id: PeerId,
    },
    /// An incoming sighting carried an invalid profile and was dropped.
    SightingRejected {
        /// The offending peer.
        peer_id: PeerId,
        /// What the validation found.
        reason: ProfileError,
    },
    /// A like was reciprocated.
    Matched {
        /// The matched peer.
        peer_id: PeerId,
        /// Current sighting, if the peer is still in range.
        sighting: Option<Sighting>,
        /// Best known profile for the peer.
        profile: Option<Profile>,
    },
}

impl DiscoveryEvent {
    /// The peer this event concerns, if any.
    pub fn peer_id(&self) -> Option<&PeerId> {
        match self {
            Self::SessionStarted { .. } | Self::SessionStopped => None,
            Self::PeerVisible { sighting, .. } => Some(&sighting.peer_id),
            Self::PeerLost { peer_id }
            | Self::SightingRejected { peer_id, .. }
            | Self::Matched { peer_id, .. } => Some(peer_id),
        }
    }
}

/// Broadcast emitter for [`DiscoveryEvent`]s.
///
/// Emission never blocks. With no subscribers, events are dropped.
#[derive(Debug)]
pub struct EventEmitter {
    sender: broadcast::Sender<DiscoveryEvent>,
}

impl EventEmitter {
    /// Create an emitter with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<DiscoveryEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all current subscribers.
    pub fn emit(&self, event: DiscoveryEvent) {
        trace!(?event, "emitting discovery event");
        // Err means no subscribers, which is fine.
        let _ = self.sender.send(event);
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
