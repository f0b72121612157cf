//! Timestamp helper.
//!
//! The engine takes `now` as an explicit argument everywhere a timestamp
//! matters, so tests can drive time without a mock clock. This helper is for
//! callers that want wall-clock time (the async driver, demo transports).

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix timestamp in milliseconds.
pub fn unix_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
