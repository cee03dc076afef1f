//! Sample source trait definition

use crate::model::{DriverCode, DriverSeries};
use anyhow::Result;

/// Trait for per-driver telemetry sources
///
/// Each source is responsible for:
/// - Identifying which driver it carries samples for
/// - Reading that driver's raw samples exactly once
/// - Converting them to the unified `DriverSeries` format
pub trait SampleSource: Send {
    /// Human-readable source name used in logs and failure reports
    /// (e.g. a file name)
    fn name(&self) -> &str;

    /// Driver the samples belong to
    fn driver_code(&self) -> &DriverCode;

    /// Read every sample of this driver
    ///
    /// Row-level problems (missing fields, unparseable times) are absorbed
    /// by the source; only failures that make the whole source unusable are
    /// returned as errors.
    fn read_series(&mut self) -> Result<DriverSeries>;
}
