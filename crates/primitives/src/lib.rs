//! Core value types shared across the Aura discovery engine.
//!
//! Profiles are immutable snapshots exchanged between devices: nothing in the
//! engine mutates a [`Profile`] in place, updates always construct a new
//! snapshot. Validation lives here so every consumer applies the same bounds.

mod peer;
mod profile;
mod time;

pub use peer::PeerId;
pub use profile::{
    Availability, DEFAULT_REPUTATION, MAX_AGE, MAX_INTERESTS, MAX_REPUTATION, MIN_AGE, Profile,
    ProfileError,
};
pub use time::unix_timestamp_ms;
