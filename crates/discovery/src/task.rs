//! Driver task wiring a transport source into a session.

use std::sync::Arc;

use aura_primitives::unix_timestamp_ms;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::session::DiscoverySession;
use crate::source::{SightingSource, TransportEvent};

/// Drive a session from a transport source until the source closes.
///
/// Forwards sightings and losses into the session with wall-clock timestamps
/// and runs the staleness sweep on the configured interval. Gating on the
/// session state happens inside the session, so the task can run across
/// start/stop cycles. Spawn it with `tokio::spawn` and abort or close the
/// source to shut it down.
pub async fn run_discovery(session: Arc<DiscoverySession>, source: impl SightingSource) {
    let mut events = source.subscribe();
    // Only the subscription is needed past this point. Holding the source
    // would keep its sender alive and mask channel closure.
    drop(source);
    let mut sweep = tokio::time::interval(session.config().sweep_interval);
    sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    debug!(local_id = %session.local_id(), "discovery driver running");

    loop {
        tokio::select! {
            _ = sweep.tick() => {
                session.sweep(unix_timestamp_ms());
            }
            event = events.recv() => match event {
                Ok(TransportEvent::Sighting { profile, signal_strength }) => {
                    session.handle_sighting(profile, signal_strength, unix_timestamp_ms());
                }
                Ok(TransportEvent::Lost { peer_id }) => {
                    session.handle_loss(&peer_id);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "discovery driver lagged, dropped transport events");
                }
                Err(RecvError::Closed) => {
                    debug!("transport source closed, discovery driver exiting");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoveryConfig;
    use crate::events::DiscoveryEvent;
    use crate::oracle::FixedOracle;
    use crate::source::ChannelSightingSource;
    use aura_ledger::InteractionLedger;
    use aura_primitives::{Availability, PeerId, Profile};
    use aura_sightings::SightingStore;
    use std::time::Duration;

    fn test_profile(id: &str) -> Profile {
        Profile::new(id, format!("Peer {id}"), 30, ["music"], Availability::Now)
    }

    fn test_session() -> Arc<DiscoverySession> {
        Arc::new(DiscoverySession::with_oracle(
            PeerId::new("local"),
            Arc::new(SightingStore::new()),
            Arc::new(InteractionLedger::new()),
            Box::new(FixedOracle(false)),
            DiscoveryConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_driver_forwards_transport_events() {
        let session = test_session();
        session.start(25.0).unwrap();
        let mut events = session.subscribe();

        let source = ChannelSightingSource::new();
        let driver = tokio::spawn(run_discovery(session.clone(), source.clone()));

        // Give the driver a beat to subscribe before publishing.
        tokio::time::sleep(Duration::from_millis(50)).await;
        source.announce_sighting(test_profile("peer-1"), 80.0);

        let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for PeerVisible")
            .unwrap();
        match event {
            DiscoveryEvent::PeerVisible { sighting, .. } => {
                assert_eq!(sighting.peer_id, PeerId::new("peer-1"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        source.announce_loss(PeerId::new("peer-1"));
        let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for PeerLost")
            .unwrap();
        match event {
            DiscoveryEvent::PeerLost { peer_id } => assert_eq!(peer_id, PeerId::new("peer-1")),
            other => panic!("unexpected event: {other:?}"),
        }

        driver.abort();
    }

    #[tokio::test]
    async fn test_driver_exits_when_source_closes() {
        let session = test_session();
        let source = ChannelSightingSource::new();
        let driver = tokio::spawn(run_discovery(session, source.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(source);

        tokio::time::timeout(Duration::from_secs(2), driver)
            .await
            .expect("driver did not exit after source close")
            .unwrap();
    }
}
