//! Timeline construction
//!
//! A timeline is the ordered list of instants at which frames are produced.
//! Union timelines reuse every real sample time; fixed-rate timelines place
//! an instant every `1 / fps` seconds. The legacy stride walks sample
//! positions instead of time and is kept for parity with older artifacts.

use crate::error::{PipelineError, Result};
use crate::model::DriverSample;

/// Sample positions per stride unit in the legacy converter
const LEGACY_STRIDE_BASE: f64 = 60.0;

/// Highest accepted output frame rate
pub const MAX_FPS: f64 = 1000.0;

/// Upper bound on fixed-rate frames, about 115 days at 5 fps
pub const MAX_FIXED_RATE_FRAMES: u64 = 50_000_000;

/// Ordered, distinct playback instants on the source clock
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    instants: Vec<f64>,
    origin: f64,
}

impl Timeline {
    pub fn instants(&self) -> &[f64] {
        &self.instants
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    /// Source-clock time of the first instant
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Iterate `(absolute, relative_to_origin)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.instants.iter().map(move |&t| (t, t - self.origin))
    }
}

/// Accepts `0 < fps <= MAX_FPS`
pub fn validate_frame_rate(fps: f64) -> Result<f64> {
    if fps > 0.0 && fps <= MAX_FPS {
        Ok(fps)
    } else {
        Err(PipelineError::InvalidFrameRate(fps))
    }
}

/// Union of every finite sample time, sorted ascending, exact duplicates
/// removed
pub fn union_timeline<'a, I>(tracks: I) -> Timeline
where
    I: IntoIterator<Item = &'a [DriverSample]>,
{
    let mut instants: Vec<f64> = tracks
        .into_iter()
        .flat_map(|samples| samples.iter().map(|s| s.time))
        .filter(|t| t.is_finite())
        .collect();
    instants.sort_by(f64::total_cmp);
    instants.dedup();

    let origin = instants.first().copied().unwrap_or(0.0);
    Timeline { instants, origin }
}

/// Uniform grid from the earliest first sample to the latest last sample.
/// Non-finite sample times are not used as endpoints.
pub fn fixed_rate_timeline<'a, I>(tracks: I, fps: f64) -> Result<Timeline>
where
    I: IntoIterator<Item = &'a [DriverSample]>,
{
    let fps = validate_frame_rate(fps)?;

    let span = tracks
        .into_iter()
        .filter_map(|samples| {
            let mut times = samples.iter().map(|s| s.time).filter(|t| t.is_finite());
            let start = times.next()?;
            let end = times.next_back().unwrap_or(start);
            Some((start, end))
        })
        .reduce(|(lo, hi), (start, end)| (lo.min(start), hi.max(end)));

    let Some((origin, end)) = span else {
        return Ok(Timeline {
            instants: Vec::new(),
            origin: 0.0,
        });
    };

    // Small tolerance so a duration that is an exact multiple of the step
    // still gets its final frame despite float error
    let steps = ((end - origin) * fps + 1e-9).floor().max(0.0);
    if steps >= MAX_FIXED_RATE_FRAMES as f64 {
        return Err(PipelineError::TimelineTooLong((steps as u64).saturating_add(1)));
    }
    let steps = steps as usize;
    let instants = (0..=steps).map(|k| origin + k as f64 / fps).collect();

    Ok(Timeline { instants, origin })
}

/// Sample positions `0, step, 2*step, ...` below the longest series length,
/// with `step = max(1, floor(60 / fps))`
pub fn legacy_stride_indices<I>(lengths: I, fps: f64) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = usize>,
{
    let fps = validate_frame_rate(fps)?;
    let step = ((LEGACY_STRIDE_BASE / fps).floor() as usize).max(1);
    let max_len = lengths.into_iter().max().unwrap_or(0);
    Ok((0..max_len).step_by(step).collect())
}
