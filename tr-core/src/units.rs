//! Serialization helpers and time formatting
//!
//! Coordinates and frame times serialize with 6 decimal places to keep the
//! artifact compact. In-memory values are never rounded.

use serde::Serializer;

const SCALE: f64 = 1_000_000.0;

fn round6_value(val: f64) -> f64 {
    let rounded = (val * SCALE).round() / SCALE;
    // Avoid emitting "-0.0" for tiny negative values
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round f64 to 6 decimal places for compact JSON serialization
pub fn round6<S: Serializer>(val: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round6_value(*val))
}

pub fn round6_opt<S: Serializer>(val: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match val {
        Some(v) => s.serialize_some(&round6_value(*v)),
        None => s.serialize_none(),
    }
}

/// Format seconds as `mm:ss`, truncating fractions and clamping negatives to zero
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round6_value() {
        assert_eq!(round6_value(0.123_456_789), 0.123_457);
        assert_eq!(round6_value(1.0), 1.0);
        assert_eq!(round6_value(-0.000_000_1), 0.0);
        assert!(round6_value(-0.000_000_1).is_sign_positive());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59.9), "00:59");
        assert_eq!(format_clock(125.0), "02:05");
        assert_eq!(format_clock(-3.0), "00:00");
        assert_eq!(format_clock(f64::NAN), "00:00");
    }
}
