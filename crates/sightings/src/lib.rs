//! Authoritative in-memory table of currently-visible peers.
//!
//! One [`SightingStore`] is owned by a single discovery session: only the
//! session mutates it, external consumers read through the query methods.
//! Every inserted sighting is enriched on the way in (distance estimate via
//! `aura-signal`, compatibility via `aura-score`), so queries never recompute.

mod sighting;
mod store;

pub use sighting::{Sighting, UpsertOutcome};
pub use store::{DEFAULT_MAX_AGE_MS, SightingStore};
