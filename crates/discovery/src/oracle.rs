//! Mutual-like resolution.
//!
//! Without a peer-to-peer exchange protocol there is no way to learn whether
//! a liked peer liked us back, so the session asks a [`MatchOracle`]. The
//! production stand-in flips a weighted coin; integrations backed by a real
//! transport can answer from actual peer state.

use aura_primitives::PeerId;
use auto_impl::auto_impl;
use rand::Rng;

/// Answers whether a liked peer has liked us back.
#[auto_impl(&, Box, Arc)]
pub trait MatchOracle: Send + Sync {
    /// True if `peer` reciprocates `local`'s like.
    fn mutual_like(&self, local: &PeerId, peer: &PeerId) -> bool;
}

/// Oracle that confirms a mutual like with fixed probability.
#[derive(Debug, Clone, Copy)]
pub struct CoinFlipOracle {
    probability: f64,
}

impl CoinFlipOracle {
    /// Create an oracle confirming with the given probability, clamped to
    /// `[0.0, 1.0]`.
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    /// The configured confirmation probability.
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl MatchOracle for CoinFlipOracle {
    fn mutual_like(&self, _local: &PeerId, _peer: &PeerId) -> bool {
        rand::rng().random_bool(self.probability)
    }
}

/// Oracle with a predetermined answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedOracle(pub bool);

impl MatchOracle for FixedOracle {
    fn mutual_like(&self, _local: &PeerId, _peer: &PeerId) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_oracle() {
        let local = PeerId::new("local");
        let peer = PeerId::new("peer");
        assert!(FixedOracle(true).mutual_like(&local, &peer));
        assert!(!FixedOracle(false).mutual_like(&local, &peer));
    }

    #[test]
    fn test_coin_flip_extremes() {
        let local = PeerId::new("local");
        let peer = PeerId::new("peer");

        let always = CoinFlipOracle::new(1.0);
        let never = CoinFlipOracle::new(0.0);
        for _ in 0..100 {
            assert!(always.mutual_like(&local, &peer));
            assert!(!never.mutual_like(&local, &peer));
        }
    }

    #[test]
    fn test_probability_clamped() {
        assert_eq!(CoinFlipOracle::new(1.5).probability(), 1.0);
        assert_eq!(CoinFlipOracle::new(-0.5).probability(), 0.0);
    }
}
