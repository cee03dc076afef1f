//! TrackReplay Core Library
//!
//! This crate provides the race data model, the sample source trait and the
//! resampling pipeline that turns per-driver position samples into one
//! time-aligned sequence of race frames.

pub mod assemble;
pub mod drivers;
pub mod error;
pub mod interpolate;
pub mod leaderboard;
pub mod model;
pub mod normalize;
pub mod playback;
pub mod source;
pub mod timeline;
pub mod units;

pub use assemble::{assemble, PipelineOptions};
pub use error::PipelineError;
pub use model::{Alignment, DriverCode, DriverSample, DriverSeries, RaceData, RaceFrame};
pub use normalize::NormalizationScope;
pub use playback::Playback;
pub use source::SampleSource;
