//! Compatibility scoring between two profiles.
//!
//! The score is a weighted sum of four independent terms: age proximity
//! (max 20), shared interests (max 30), availability overlap (max 20) and the
//! peer's reputation (max 20). Age and interest terms are symmetric; the
//! reputation term is a property of the scored peer only, so
//! `compatibility(a, b)` and `compatibility(b, a)` can differ.

use aura_primitives::{Availability, Profile};

/// Maximum points from age proximity.
const AGE_WEIGHT: f64 = 20.0;
/// Maximum points from shared interests.
const INTEREST_WEIGHT: f64 = 30.0;
/// Points for identical availability.
const AVAILABILITY_EXACT: f64 = 20.0;
/// Points for the {now, tonight} pairing in either order.
const AVAILABILITY_SOON: f64 = 15.0;
/// Points when either side is flexible.
const AVAILABILITY_FLEXIBLE: f64 = 10.0;
/// Maximum points from reputation.
const REPUTATION_WEIGHT: f64 = 20.0;
/// Reputation units per point.
const REPUTATION_DIVISOR: f64 = 50.0;

/// Compute the 0-100 compatibility score between the local profile and a peer.
///
/// Term bounds guarantee the sum cannot exceed 100; the final clamp only
/// guards against floating rounding nudging a term past its cap.
pub fn compatibility(local: &Profile, peer: &Profile) -> u8 {
    let total =
        age_term(local, peer) + interest_term(local, peer) + availability_term(local, peer)
            + reputation_term(peer);
    total.round().clamp(0.0, 100.0) as u8
}

/// Score against an optional local profile.
///
/// With no local profile set there is nothing to compare against; the score
/// degenerates to 0 rather than failing.
pub fn compatibility_opt(local: Option<&Profile>, peer: &Profile) -> u8 {
    local.map(|local| compatibility(local, peer)).unwrap_or(0)
}

fn age_term(local: &Profile, peer: &Profile) -> f64 {
    let gap = local.age.abs_diff(peer.age) as f64;
    (AGE_WEIGHT - gap).max(0.0)
}

fn interest_term(local: &Profile, peer: &Profile) -> f64 {
    let larger = local.interests.len().max(peer.interests.len());
    if larger == 0 {
        return 0.0;
    }
    let shared = local.interests.intersection(&peer.interests).count();
    INTEREST_WEIGHT * shared as f64 / larger as f64
}

/// Exact match wins even when one side is also flexible.
fn availability_term(local: &Profile, peer: &Profile) -> f64 {
    use Availability::{Now, Tonight};

    if local.availability == peer.availability {
        return AVAILABILITY_EXACT;
    }
    if matches!(
        (local.availability, peer.availability),
        (Now, Tonight) | (Tonight, Now)
    ) {
        return AVAILABILITY_SOON;
    }
    if local.availability.is_flexible() || peer.availability.is_flexible() {
        return AVAILABILITY_FLEXIBLE;
    }
    0.0
}

fn reputation_term(peer: &Profile) -> f64 {
    (peer.reputation as f64 / REPUTATION_DIVISOR).min(REPUTATION_WEIGHT)
}
