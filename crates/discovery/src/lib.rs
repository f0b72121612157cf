//! Scan-session orchestration for the Aura discovery engine.
//!
//! A [`DiscoverySession`] brackets a period of sighting ingestion: it owns the
//! sighting table and the interaction ledger, consumes transport-delivered
//! sighting/loss events while active, runs the like/pass/match state machine,
//! and broadcasts enriched [`DiscoveryEvent`]s to UI and messaging consumers.
//!
//! The two capabilities the reference app simulated with ad-hoc randomness
//! are explicit seams here: a [`SightingSource`] produces transport events and
//! a [`MatchOracle`] decides mutual likes, so production and test
//! implementations swap without touching the engine.
//!
//! Components are constructed explicitly and wired by the caller; nothing in
//! this crate is a global.

mod config;
mod error;
mod events;
mod oracle;
mod session;
mod source;
mod task;

pub use config::{
    DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_MATCH_PROBABILITY, DEFAULT_RADIUS_M,
    DEFAULT_SWEEP_INTERVAL, DiscoveryConfig,
};
pub use error::DiscoveryError;
pub use events::{DiscoveryEvent, EventEmitter};
pub use oracle::{CoinFlipOracle, FixedOracle, MatchOracle};
pub use session::{DiscoverySession, LikeOutcome, SessionState, StartOutcome, StopOutcome};
pub use source::{
    ChannelSightingSource, SightingSource, TRANSPORT_CHANNEL_CAPACITY, TransportEvent,
    TransportReceiver, TransportSender, transport_channel,
};
pub use task::run_discovery;
