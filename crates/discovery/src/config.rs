//! Session configuration.

use std::time::Duration;

/// Scan radius used when the caller does not pick one, in meters.
pub const DEFAULT_RADIUS_M: f64 = 25.0;

/// How often the staleness sweep runs in the driver task.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Broadcast channel capacity for discovery events.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Probability the stand-in match oracle confirms a mutual like.
pub const DEFAULT_MATCH_PROBABILITY: f64 = 0.30;

/// Discovery session configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Radius used by [`DiscoverySession::start_default`](crate::DiscoverySession::start_default).
    pub default_radius_m: f64,
    /// Sightings not refreshed within this window are evicted by the sweep.
    pub stale_after_ms: u64,
    /// Cadence of the periodic sweep in the driver task.
    pub sweep_interval: Duration,
    /// Capacity of the event broadcast channel.
    pub event_channel_capacity: usize,
    /// Mutual-like probability for the default [`CoinFlipOracle`](crate::CoinFlipOracle).
    pub match_probability: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            default_radius_m: DEFAULT_RADIUS_M,
            stale_after_ms: aura_sightings::DEFAULT_MAX_AGE_MS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            match_probability: DEFAULT_MATCH_PROBABILITY,
        }
    }
}
