//! Per-driver position lookup at a timeline instant

use crate::model::DriverSample;

/// Position of one driver at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub lap: u32,
}

impl From<&DriverSample> for Position {
    fn from(s: &DriverSample) -> Self {
        Self {
            x: s.x,
            y: s.y,
            lap: s.lap,
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Linearly interpolate a time-ordered series at `t`.
///
/// `before` is the last sample with `time <= t` and `after` the first with
/// `time >= t`. Outside the sampled range the nearest edge sample is held.
/// When several samples share `t`, the first of them wins. The lap number is
/// taken from `before`.
///
/// Returns `None` only for an empty series.
pub fn interpolate_at(samples: &[DriverSample], t: f64) -> Option<Position> {
    let last = samples.last()?;

    // Index of the first sample with time >= t
    let idx = samples.partition_point(|s| s.time < t);

    let (before, after) = match samples.get(idx) {
        None => (last, last),
        Some(at) if idx == 0 || at.time == t => (at, at),
        Some(at) => (&samples[idx - 1], at),
    };

    if before.time == after.time {
        return Some(Position::from(before));
    }

    // Only reached when t lies strictly inside [before.time, after.time]
    debug_assert!(before.time < t && t < after.time);
    let ratio = (t - before.time) / (after.time - before.time);
    Some(Position {
        x: lerp(before.x, after.x, ratio),
        y: lerp(before.y, after.y, ratio),
        lap: before.lap,
    })
}

/// Sample at position `index`, holding the last sample once the series has
/// run out. No interpolation.
pub fn sample_at_index(samples: &[DriverSample], index: usize) -> Option<Position> {
    samples
        .get(index)
        .or_else(|| samples.last())
        .map(Position::from)
}
