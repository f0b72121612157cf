//! Discovery error taxonomy.
//!
//! Nothing here is fatal: radius and ledger problems are reported to the
//! caller, profile validation failures become diagnostic events, and invalid
//! state transitions are benign no-ops surfaced as outcome enums rather than
//! errors.

use aura_ledger::LedgerStoreError;
use aura_signal::{MAX_RADIUS_M, MIN_RADIUS_M};
use thiserror::Error;

/// Errors reported by the discovery session.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Requested scan radius outside the accepted bounds. No state change.
    #[error("scan radius {radius_m}m outside accepted range {MIN_RADIUS_M}-{MAX_RADIUS_M}m")]
    InvalidRadius {
        /// The rejected radius.
        radius_m: f64,
    },
    /// Ledger persistence failure.
    #[error(transparent)]
    Ledger(#[from] LedgerStoreError),
}
