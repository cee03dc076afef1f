//! Coordinate normalization into the unit square
//!
//! By default every driver is scaled against its own extents so each trace
//! fills `[0, 1]` on both axes. `Shared` scope scales all drivers against one
//! common bounding box instead, which keeps their relative geometry.

use crate::model::{Bounds, DegenerateAxes, DriverSample, DriverSeries, NormalizedDriverSeries};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationScope {
    #[default]
    PerDriver,
    Shared,
}

fn has_extent(span: f64) -> bool {
    span > 0.0
}

/// Map `value` from `[min, max]` to `[0, 1]`. A zero-width range maps to 0.0.
fn scale(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if has_extent(span) {
        (value - min) / span
    } else {
        0.0
    }
}

/// Normalize one series against its own extents. `None` for an empty series.
pub fn normalize_series(series: &DriverSeries) -> Option<NormalizedDriverSeries> {
    let bounds = Bounds::from_samples(series.samples())?;
    Some(normalize_with_bounds(series, bounds))
}

/// Normalize one series against caller-supplied extents
pub fn normalize_with_bounds(series: &DriverSeries, bounds: Bounds) -> NormalizedDriverSeries {
    let degenerate = DegenerateAxes {
        x: !has_extent(bounds.width()),
        y: !has_extent(bounds.height()),
    };
    if degenerate.any() {
        warn!(
            driver = %series.code(),
            x = degenerate.x,
            y = degenerate.y,
            "Zero-width coordinate range, pinning axis to 0.0"
        );
    }

    let samples = series
        .samples()
        .iter()
        .map(|s| DriverSample {
            x: scale(s.x, bounds.min_x, bounds.max_x),
            y: scale(s.y, bounds.min_y, bounds.max_y),
            ..*s
        })
        .collect();

    NormalizedDriverSeries {
        code: series.code().clone(),
        samples,
        bounds,
        degenerate,
    }
}

/// Normalize every non-empty series, preserving input order
pub fn normalize_all<'a, I>(series: I, scope: NormalizationScope) -> Vec<NormalizedDriverSeries>
where
    I: IntoIterator<Item = &'a DriverSeries>,
{
    let populated: Vec<&DriverSeries> = series.into_iter().filter(|s| !s.is_empty()).collect();

    match scope {
        NormalizationScope::PerDriver => populated
            .into_iter()
            .filter_map(normalize_series)
            .collect(),
        NormalizationScope::Shared => {
            let shared = populated
                .iter()
                .filter_map(|s| Bounds::from_samples(s.samples()))
                .reduce(|a, b| a.union(&b));
            match shared {
                Some(bounds) => populated
                    .into_iter()
                    .map(|s| normalize_with_bounds(s, bounds))
                    .collect(),
                None => Vec::new(),
            }
        }
    }
}
