//! Race data model
//!
//! Raw samples (`DriverSample`) are grouped per driver into a time-ordered
//! `DriverSeries`. The pipeline turns those into `RaceFrame`s, each holding
//! one entry per driver, and packages them as the `RaceData` artifact that
//! playback consumes by frame index.

use crate::error::{PipelineError, Result};
use crate::timeline::validate_frame_rate;
use crate::units::{round6, round6_opt};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Short upper-case token identifying a competitor (e.g. "VER")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DriverCode(String);

impl DriverCode {
    /// Trim and upper-case `raw`. Empty tokens and tokens containing
    /// whitespace are rejected.
    pub fn new(raw: &str) -> Result<Self> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(PipelineError::InvalidDriverCode(raw.to_string()));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DriverCode {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<DriverCode> for String {
    fn from(code: DriverCode) -> Self {
        code.0
    }
}

impl fmt::Display for DriverCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One raw position reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverSample {
    /// Seconds on the source's clock
    pub time: f64,
    pub x: f64,
    pub y: f64,
    /// Lap number, always >= 1
    pub lap: u32,
}

impl DriverSample {
    pub fn new(time: f64, x: f64, y: f64, lap: u32) -> Self {
        Self {
            time,
            x,
            y,
            lap: lap.max(1),
        }
    }
}

/// All samples of one driver, ordered by non-decreasing time
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSeries {
    code: DriverCode,
    samples: Vec<DriverSample>,
}

impl DriverSeries {
    /// Build a series from samples in source order.
    ///
    /// Out-of-order input is stably sorted by time, so samples sharing a
    /// timestamp keep their original relative order.
    pub fn new(code: DriverCode, mut samples: Vec<DriverSample>) -> Self {
        if !is_time_ordered(&samples) {
            warn!(driver = %code, "Samples out of time order, sorting");
            samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        Self { code, samples }
    }

    pub fn code(&self) -> &DriverCode {
        &self.code
    }

    pub fn samples(&self) -> &[DriverSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last sample time, `None` for an empty series
    pub fn time_range(&self) -> Option<(f64, f64)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.time_range()
            .map(|(start, end)| end - start)
            .unwrap_or(0.0)
    }
}

fn is_time_ordered(samples: &[DriverSample]) -> bool {
    samples.windows(2).all(|w| w[0].time <= w[1].time)
}

/// Coordinate extents of one or more series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_samples(samples: &[DriverSample]) -> Option<Self> {
        let first = samples.first()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(samples.iter().fold(init, |b, s| Bounds {
            min_x: b.min_x.min(s.x),
            max_x: b.max_x.max(s.x),
            min_y: b.min_y.min(s.y),
            max_y: b.max_y.max(s.y),
        }))
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Axes whose extent had zero width and were pinned to 0.0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegenerateAxes {
    pub x: bool,
    pub y: bool,
}

impl DegenerateAxes {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// A series rescaled into the unit square
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDriverSeries {
    pub code: DriverCode,
    pub samples: Vec<DriverSample>,
    /// Extents the samples were scaled against
    pub bounds: Bounds,
    pub degenerate: DegenerateAxes,
}

/// How frames are placed on the time axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// One frame per distinct sample time across all drivers
    Union,
    /// One frame every `1 / fps` seconds, positions interpolated
    #[default]
    FixedRate,
    /// Every `floor(60 / fps)`-th sample of each driver, no interpolation
    LegacyStride,
}

/// One driver's position inside a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverFrameEntry {
    pub code: DriverCode,
    pub lap: u32,
    #[serde(serialize_with = "round6")]
    pub x: f64,
    #[serde(serialize_with = "round6")]
    pub y: f64,
}

/// Synchronized snapshot of every driver at one playback instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceFrame {
    pub index: usize,

    /// Seconds since the first frame; absent for legacy stride frames
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "round6_opt"
    )]
    pub time_sec: Option<f64>,

    pub drivers: Vec<DriverFrameEntry>,
}

/// The terminal artifact handed to playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceData {
    pub fps: f64,

    #[serde(default = "legacy_alignment")]
    pub alignment: Alignment,

    /// Driver codes in discovery order
    pub drivers: Vec<DriverCode>,

    pub frames: Vec<RaceFrame>,
}

// Artifacts written before the field existed were index-strided
fn legacy_alignment() -> Alignment {
    Alignment::LegacyStride
}

impl RaceData {
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&RaceFrame> {
        self.frames.get(index)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Parse an artifact and check its structural invariants
    pub fn from_json(json: &str) -> Result<Self> {
        let data: RaceData = serde_json::from_str(json)
            .map_err(|e| PipelineError::MalformedArtifact(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    /// Check that indices are sequential and that every frame lists each
    /// driver exactly once, in `drivers` order. Union and fixed-rate frames
    /// must also carry finite, non-decreasing `timeSec` values.
    pub fn validate(&self) -> Result<()> {
        validate_frame_rate(self.fps)?;
        let timed = self.alignment != Alignment::LegacyStride;
        let mut previous_time = f64::NEG_INFINITY;

        for (i, frame) in self.frames.iter().enumerate() {
            if frame.index != i {
                return Err(PipelineError::MalformedArtifact(format!(
                    "frame at position {i} has index {}",
                    frame.index
                )));
            }
            let codes_match = frame.drivers.len() == self.drivers.len()
                && frame
                    .drivers
                    .iter()
                    .zip(&self.drivers)
                    .all(|(entry, code)| &entry.code == code);
            if !codes_match {
                return Err(PipelineError::MalformedArtifact(format!(
                    "frame {i} does not list every driver in order"
                )));
            }
            if timed {
                let time = frame.time_sec.filter(|t| t.is_finite()).ok_or_else(|| {
                    PipelineError::MalformedArtifact(format!("frame {i} has no timeSec"))
                })?;
                if time < previous_time {
                    return Err(PipelineError::MalformedArtifact(format!(
                        "frame {i} timeSec {time} is earlier than the frame before it"
                    )));
                }
                previous_time = time;
            }
        }
        Ok(())
    }
}
