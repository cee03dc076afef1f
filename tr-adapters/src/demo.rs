//! Demo source that generates synthetic timing exports
//!
//! Simulates cars lapping an oval street circuit with straights, braking
//! zones and corners. Samples arrive at irregular intervals with occasional
//! gaps, the way real positioning feeds do, so every alignment mode has
//! something to resample.

use crate::error::SourceError;
use crate::time::format_session_time;
use anyhow::Result;
use std::f64::consts::TAU;
use std::io::Write;
use tr_core::drivers;
use tr_core::model::{DriverCode, DriverSample, DriverSeries};
use tr_core::source::SampleSource;

// =============================================================================
// Circuit definition: a lap as a sequence of segments
// =============================================================================

#[derive(Clone, Copy)]
enum SegmentKind {
    Straight, // Constant pace
    Braking,  // Decelerating into a corner
    Corner,   // Slow, constant pace
    Accel,    // Picking up pace on exit
}

#[derive(Clone, Copy)]
struct TrackSegment {
    kind: SegmentKind,
    /// Share of the lap time spent in the segment
    time_share: f64,
    /// Share of the lap distance covered by the segment
    arc_share: f64,
}

/// Four straights joined by corners. Shares sum to 1.
const CIRCUIT: &[TrackSegment] = &[
    TrackSegment { kind: SegmentKind::Straight, time_share: 0.16, arc_share: 0.22 },
    TrackSegment { kind: SegmentKind::Braking,  time_share: 0.04, arc_share: 0.03 },
    TrackSegment { kind: SegmentKind::Corner,   time_share: 0.07, arc_share: 0.04 },
    TrackSegment { kind: SegmentKind::Accel,    time_share: 0.05, arc_share: 0.04 },
    TrackSegment { kind: SegmentKind::Straight, time_share: 0.10, arc_share: 0.13 },
    TrackSegment { kind: SegmentKind::Braking,  time_share: 0.04, arc_share: 0.03 },
    TrackSegment { kind: SegmentKind::Corner,   time_share: 0.08, arc_share: 0.04 },
    TrackSegment { kind: SegmentKind::Accel,    time_share: 0.05, arc_share: 0.04 },
    TrackSegment { kind: SegmentKind::Straight, time_share: 0.18, arc_share: 0.26 },
    TrackSegment { kind: SegmentKind::Braking,  time_share: 0.04, arc_share: 0.03 },
    TrackSegment { kind: SegmentKind::Corner,   time_share: 0.09, arc_share: 0.05 },
    TrackSegment { kind: SegmentKind::Accel,    time_share: 0.05, arc_share: 0.04 },
    TrackSegment { kind: SegmentKind::Straight, time_share: 0.05, arc_share: 0.05 },
];

/// Circuit outline in raw track units
const CENTER: (f64, f64) = (-1200.0, 800.0);
const RADIUS_X: f64 = 4200.0;
const RADIUS_Y: f64 = 2600.0;

/// Fraction of the lap distance covered `lap_fraction` of the way through
/// the lap's time
fn arc_position(lap_fraction: f64) -> f64 {
    let mut time_start = 0.0;
    let mut arc_start = 0.0;

    for seg in CIRCUIT {
        let time_end = time_start + seg.time_share;
        if lap_fraction < time_end {
            let local = (lap_fraction - time_start) / seg.time_share;
            let eased = match seg.kind {
                SegmentKind::Straight | SegmentKind::Corner => local,
                // Fast entry, slow exit
                SegmentKind::Braking => 1.0 - (1.0 - local) * (1.0 - local),
                // Slow entry, fast exit
                SegmentKind::Accel => local * local,
            };
            return arc_start + eased * seg.arc_share;
        }
        time_start = time_end;
        arc_start += seg.arc_share;
    }
    arc_start.min(1.0)
}

/// Point on the outline for a lap distance fraction
fn track_point(arc: f64) -> (f64, f64) {
    let angle = arc * TAU;
    // Squashed ends give the oval flatter straights
    let x = CENTER.0 + RADIUS_X * angle.cos();
    let y = CENTER.1 + RADIUS_Y * angle.sin() * (1.0 + 0.12 * (2.0 * angle).cos());
    (x, y)
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Simple deterministic noise from a seed
fn noise(seed: f64) -> f64 {
    let x = (seed * 12.9898 + 78.233).sin() * 43_758.547;
    x - x.floor()
}

/// Small jitter centered around 0
fn jitter(seed: f64, amplitude: f64) -> f64 {
    (noise(seed) - 0.5) * 2.0 * amplitude
}

// =============================================================================
// DemoSource
// =============================================================================

/// Knobs for one synthetic driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoParams {
    pub laps: u32,
    /// Seconds per lap
    pub lap_time: f64,
    /// Mean seconds between samples
    pub sample_interval: f64,
    /// Session clock at the first sample
    pub session_start: f64,
    /// Lap fraction the car starts behind the line
    pub grid_offset: f64,
    /// Noise seed, distinct per driver
    pub seed: f64,
}

impl Default for DemoParams {
    fn default() -> Self {
        Self {
            laps: 3,
            lap_time: 95.0,
            sample_interval: 0.25,
            session_start: 3300.0,
            grid_offset: 0.0,
            seed: 1.0,
        }
    }
}

pub struct DemoSource {
    name: String,
    code: DriverCode,
    params: DemoParams,
}

impl DemoSource {
    pub fn new(code: DriverCode, params: DemoParams) -> Self {
        Self {
            name: format!("demo:{code}"),
            code,
            params,
        }
    }

    pub fn params(&self) -> &DemoParams {
        &self.params
    }

    /// Generate the driver's samples. Same params, same samples.
    pub fn samples(&self) -> Vec<DriverSample> {
        let p = &self.params;
        if p.laps == 0 || !is_positive(p.lap_time) || !is_positive(p.sample_interval) {
            return Vec::new();
        }

        let race_secs = p.laps as f64 * p.lap_time;
        let mut samples = Vec::new();
        let mut elapsed = 0.0;
        let mut n = 0u64;

        while elapsed <= race_secs {
            let s = n as f64 + p.seed * 101.0; // noise seed
            n += 1;

            // Feed dropouts leave gaps of a few samples
            if n > 1 && noise(s * 2.7) < 0.03 {
                elapsed += p.sample_interval * 3.0;
                continue;
            }

            // Small pace wobble so cars do not hold a fixed gap
            let distance = (elapsed / p.lap_time + 0.004 * (elapsed * 0.05 + p.seed).sin()
                - p.grid_offset)
                .max(0.0);
            let lap = (distance.floor() as u32 + 1).min(p.laps);
            let (x, y) = track_point(arc_position(distance.fract()));

            samples.push(DriverSample::new(
                p.session_start + elapsed,
                x + jitter(s * 1.1, 1.5),
                y + jitter(s * 1.3, 1.5),
                lap,
            ));

            elapsed += p.sample_interval * (1.0 + jitter(s * 1.7, 0.35));
        }

        samples
    }

    /// Write the samples as a timing export (`SessionTime,X,Y,LapNumber`)
    /// that [`crate::CsvSource`] reads back
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["SessionTime", "X", "Y", "LapNumber"])?;
        for sample in self.samples() {
            wtr.write_record([
                format_session_time(sample.time),
                format!("{:.3}", sample.x),
                format!("{:.3}", sample.y),
                sample.lap.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl SampleSource for DemoSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn driver_code(&self) -> &DriverCode {
        &self.code
    }

    fn read_series(&mut self) -> Result<DriverSeries> {
        let samples = self.samples();
        if samples.is_empty() {
            return Err(SourceError::Empty(self.name.clone()).into());
        }
        Ok(DriverSeries::new(self.code.clone(), samples))
    }
}

/// Up to `count` demo drivers taken from the registry grid, each a little
/// slower and further back than the one before. The registry caps the count.
pub fn demo_grid(count: usize, base: DemoParams) -> Vec<DemoSource> {
    drivers::all()
        .iter()
        .take(count)
        .enumerate()
        .filter_map(|(i, meta)| {
            let code = DriverCode::new(meta.code).ok()?;
            let i = i as f64;
            let params = DemoParams {
                lap_time: base.lap_time + i * 0.3,
                sample_interval: base.sample_interval * (1.0 + (i % 4.0) * 0.08),
                session_start: base.session_start + noise(i + 0.5) * 0.2,
                grid_offset: base.grid_offset + i * 0.008,
                seed: base.seed + i,
                ..base
            };
            Some(DemoSource::new(code, params))
        })
        .collect()
}
