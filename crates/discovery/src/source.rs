//! Transport-facing sighting input.
//!
//! The engine does not talk to radios. Whatever scans the physical medium
//! (BLE, mDNS, a simulator) publishes [`TransportEvent`]s through a
//! [`SightingSource`], and the driver task feeds them into the session.

use aura_primitives::{PeerId, Profile};
use auto_impl::auto_impl;
use tokio::sync::broadcast;

/// Capacity of the transport event channel.
pub const TRANSPORT_CHANNEL_CAPACITY: usize = 1024;

/// Raw events produced by a transport scanner.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A peer was observed broadcasting its profile.
    Sighting {
        /// The peer's advertised profile. Validated on ingestion.
        profile: Profile,
        /// Received signal strength, nominally `0.0..=100.0`.
        signal_strength: f64,
    },
    /// The transport determined a peer is gone.
    Lost {
        /// The departed peer.
        peer_id: PeerId,
    },
}

/// Sender half of a transport event channel.
pub type TransportSender = broadcast::Sender<TransportEvent>;

/// Receiver half of a transport event channel.
pub type TransportReceiver = broadcast::Receiver<TransportEvent>;

/// Create a transport event channel with the default capacity.
pub fn transport_channel() -> (TransportSender, TransportReceiver) {
    broadcast::channel(TRANSPORT_CHANNEL_CAPACITY)
}

/// Produces transport events for a discovery driver to consume.
#[auto_impl(&, Box, Arc)]
pub trait SightingSource: Send + Sync {
    /// Subscribe to events published from this point on.
    fn subscribe(&self) -> TransportReceiver;
}

/// A [`SightingSource`] fed manually through a broadcast channel.
///
/// Transport integrations hold one of these and publish scan results into
/// it. Also the natural source for tests and simulations.
#[derive(Debug, Clone)]
pub struct ChannelSightingSource {
    sender: TransportSender,
}

impl ChannelSightingSource {
    /// Create a source with the default channel capacity.
    pub fn new() -> Self {
        let (sender, _) = transport_channel();
        Self { sender }
    }

    /// The underlying sender, for publishing from other components.
    pub fn sender(&self) -> TransportSender {
        self.sender.clone()
    }

    /// Publish a sighting. Dropped if no driver is subscribed.
    pub fn announce_sighting(&self, profile: Profile, signal_strength: f64) {
        let _ = self.sender.send(TransportEvent::Sighting {
            profile,
            signal_strength,
        });
    }

    /// Publish a peer loss. Dropped if no driver is subscribed.
    pub fn announce_loss(&self, peer_id: PeerId) {
        let _ = self.sender.send(TransportEvent::Lost { peer_id });
    }
}

impl Default for ChannelSightingSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SightingSource for ChannelSightingSource {
    fn subscribe(&self) -> TransportReceiver {
        self.sender.subscribe()
    }
}
