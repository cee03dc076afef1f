//! Frame assembly
//!
//! Runs the whole pipeline over a set of parsed driver series: drop empty
//! drivers, normalize coordinates, build the timeline for the requested
//! alignment and sample every driver at every instant.

use crate::error::{PipelineError, Result};
use crate::interpolate::{interpolate_at, sample_at_index, Position};
use crate::model::{
    Alignment, DriverCode, DriverFrameEntry, DriverSample, DriverSeries, NormalizedDriverSeries,
    RaceData, RaceFrame,
};
use crate::normalize::{normalize_all, NormalizationScope};
use crate::timeline::{fixed_rate_timeline, legacy_stride_indices, union_timeline, validate_frame_rate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_FPS: f64 = 5.0;

/// Knobs for a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub fps: f64,
    pub alignment: Alignment,
    pub scope: NormalizationScope,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            alignment: Alignment::default(),
            scope: NormalizationScope::default(),
        }
    }
}

/// Turn parsed driver series into the race data artifact.
///
/// Drivers without samples are left out of both `drivers` and the frames.
/// Fails with `NoDrivers` when nothing usable remains.
pub fn assemble(series: &[DriverSeries], options: &PipelineOptions) -> Result<RaceData> {
    let fps = validate_frame_rate(options.fps)?;

    for empty in series.iter().filter(|s| s.is_empty()) {
        warn!(driver = %empty.code(), "Driver has no samples, excluding from race data");
    }

    let normalized = normalize_all(series, options.scope);
    if normalized.is_empty() {
        return Err(PipelineError::NoDrivers);
    }

    let frames = match options.alignment {
        Alignment::Union => union_frames(&normalized),
        Alignment::FixedRate => fixed_rate_frames(&normalized, fps)?,
        Alignment::LegacyStride => legacy_stride_frames(&normalized, fps)?,
    };

    let drivers: Vec<DriverCode> = normalized.iter().map(|n| n.code.clone()).collect();

    info!(
        drivers = drivers.len(),
        frames = frames.len(),
        fps,
        alignment = ?options.alignment,
        "Assembled race data"
    );

    Ok(RaceData {
        fps,
        alignment: options.alignment,
        drivers,
        frames,
    })
}

fn tracks(normalized: &[NormalizedDriverSeries]) -> impl Iterator<Item = &[DriverSample]> {
    normalized.iter().map(|n| n.samples.as_slice())
}

/// Collect one entry per driver, in driver order
fn build_frame<F>(
    index: usize,
    time_sec: Option<f64>,
    normalized: &[NormalizedDriverSeries],
    mut position_of: F,
) -> RaceFrame
where
    F: FnMut(&NormalizedDriverSeries) -> Option<Position>,
{
    let drivers = normalized
        .iter()
        .filter_map(|n| {
            position_of(n).map(|p| DriverFrameEntry {
                code: n.code.clone(),
                lap: p.lap,
                x: p.x,
                y: p.y,
            })
        })
        .collect();

    RaceFrame {
        index,
        time_sec,
        drivers,
    }
}

fn union_frames(normalized: &[NormalizedDriverSeries]) -> Vec<RaceFrame> {
    let timeline = union_timeline(tracks(normalized));
    debug!(instants = timeline.len(), "Built union timeline");

    timeline
        .iter()
        .enumerate()
        .map(|(index, (t, relative))| {
            build_frame(index, Some(relative), normalized, |n| {
                interpolate_at(&n.samples, t)
            })
        })
        .collect()
}

fn fixed_rate_frames(normalized: &[NormalizedDriverSeries], fps: f64) -> Result<Vec<RaceFrame>> {
    let timeline = fixed_rate_timeline(tracks(normalized), fps)?;
    debug!(instants = timeline.len(), origin = timeline.origin(), "Built fixed-rate timeline");

    Ok(timeline
        .iter()
        .enumerate()
        .map(|(index, (t, _))| {
            // index / fps rather than t - origin keeps the grid free of
            // accumulated float error
            let time_sec = index as f64 / fps;
            build_frame(index, Some(time_sec), normalized, |n| {
                interpolate_at(&n.samples, t)
            })
        })
        .collect())
}

fn legacy_stride_frames(normalized: &[NormalizedDriverSeries], fps: f64) -> Result<Vec<RaceFrame>> {
    let indices = legacy_stride_indices(normalized.iter().map(|n| n.samples.len()), fps)?;
    debug!(frames = indices.len(), "Built legacy stride indices");

    Ok(indices
        .into_iter()
        .enumerate()
        .map(|(index, sample_idx)| {
            build_frame(index, None, normalized, |n| {
                sample_at_index(&n.samples, sample_idx)
            })
        })
        .collect())
}
