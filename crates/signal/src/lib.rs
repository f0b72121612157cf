//! Signal-strength to distance estimation.
//!
//! Raw sightings carry a normalized 0-100 strength sample. This module maps a
//! sample to a distance estimate in meters for a given scan radius. The
//! mapping is a deliberately simple linear placeholder for real RSSI physics;
//! the one property downstream code relies on is monotonicity: stronger
//! signal never estimates farther away.

/// Strength below which a sample carries no usable ranging information.
pub const NOISE_FLOOR: f64 = 30.0;

/// Closest distance the model will report, in meters.
pub const MIN_DISTANCE_M: f64 = 0.5;

/// Added to the radius for samples below the noise floor, marking them
/// "out of usable range" without discarding them.
pub const OUT_OF_RANGE_BUFFER_M: f64 = 5.0;

/// Minimum configurable scan radius in meters.
pub const MIN_RADIUS_M: f64 = 5.0;

/// Maximum configurable scan radius in meters.
pub const MAX_RADIUS_M: f64 = 50.0;

/// Maximum raw signal-strength sample.
const MAX_SIGNAL: f64 = 100.0;

/// Returns true if the radius is a valid scan radius.
pub fn radius_in_bounds(radius_m: f64) -> bool {
    radius_m.is_finite() && (MIN_RADIUS_M..=MAX_RADIUS_M).contains(&radius_m)
}

/// Estimate the distance to a peer from a raw signal-strength sample.
///
/// Out-of-domain samples are clamped, not rejected; non-finite samples are
/// treated as zero strength. Below [`NOISE_FLOOR`] the estimate is
/// `radius + OUT_OF_RANGE_BUFFER_M`; callers decide whether to keep or drop
/// those sightings. In-range samples remap linearly onto
/// `[radius, MIN_DISTANCE_M]`, so the result is monotone non-increasing in
/// signal strength for a fixed radius.
///
/// Never panics and always returns a finite number.
pub fn estimate_distance(signal_strength: f64, radius_m: f64) -> f64 {
    let signal = if signal_strength.is_finite() {
        signal_strength.clamp(0.0, MAX_SIGNAL)
    } else {
        0.0
    };
    let radius = if radius_m.is_finite() {
        radius_m.clamp(MIN_RADIUS_M, MAX_RADIUS_M)
    } else {
        MIN_RADIUS_M
    };

    if signal < NOISE_FLOOR {
        return radius + OUT_OF_RANGE_BUFFER_M;
    }

    let distance = radius * (1.0 - (signal - NOISE_FLOOR) / (MAX_SIGNAL - NOISE_FLOOR));
    distance.clamp(MIN_DISTANCE_M, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_noise_floor_is_out_of_range() {
        for signal in [0.0, 10.0, 29.0, 29.999] {
            assert_eq!(estimate_distance(signal, 10.0), 15.0);
            assert_eq!(estimate_distance(signal, 50.0), 55.0);
        }
    }

    #[test]
    fn test_monotone_non_increasing() {
        for radius in [5.0, 10.0, 25.0, 50.0] {
            let mut previous = f64::INFINITY;
            let mut signal = NOISE_FLOOR;
            while signal <= 100.0 {
                let distance = estimate_distance(signal, radius);
                assert!(
                    distance <= previous,
                    "distance increased at signal={signal} radius={radius}"
                );
                previous = distance;
                signal += 0.5;
            }
        }
    }

    #[test]
    fn test_range_endpoints() {
        // At the noise floor the estimate is the full radius.
        assert_eq!(estimate_distance(NOISE_FLOOR, 10.0), 10.0);
        // At full strength the estimate clamps to the minimum distance.
        assert_eq!(estimate_distance(100.0, 10.0), MIN_DISTANCE_M);
    }

    #[test]
    fn test_reference_value() {
        // signal 90, radius 10: 10 * (1 - 60/70) ~ 1.428m
        let distance = estimate_distance(90.0, 10.0);
        assert!((distance - 10.0 * (1.0 - 60.0 / 70.0)).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_domain_samples_clamped() {
        assert_eq!(estimate_distance(150.0, 10.0), MIN_DISTANCE_M);
        assert_eq!(estimate_distance(-20.0, 10.0), 15.0);
        assert!(estimate_distance(f64::NAN, 10.0).is_finite());
        assert!(estimate_distance(55.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_radius_bounds() {
        assert!(radius_in_bounds(5.0));
        assert!(radius_in_bounds(50.0));
        assert!(!radius_in_bounds(4.999));
        assert!(!radius_in_bounds(50.001));
        assert!(!radius_in_bounds(f64::NAN));
    }
}
