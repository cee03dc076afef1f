//! Frame leaderboard
//!
//! Frames carry no timing gaps, so running order is estimated from what
//! they do carry: lap number first, then normalized x as track progress.

use crate::drivers;
use crate::model::{DriverCode, RaceFrame};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based running position
    pub position: usize,
    pub code: DriverCode,
    pub name: String,
    pub color: &'static str,
    pub lap: u32,
    pub progress: f64,
}

/// Order the drivers of `frame` by lap (descending) then x (descending).
/// Ties keep frame order.
pub fn standings(frame: &RaceFrame) -> Vec<Standing> {
    let mut entries: Vec<_> = frame.drivers.iter().collect();
    entries.sort_by(|a, b| b.lap.cmp(&a.lap).then(b.x.total_cmp(&a.x)));

    entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| Standing {
            position: i + 1,
            code: e.code.clone(),
            name: drivers::display_name(e.code.as_str()).to_string(),
            color: drivers::color(e.code.as_str()),
            lap: e.lap,
            progress: e.x,
        })
        .collect()
}

/// Highest lap number in the frame, 0 for an empty frame
pub fn leader_lap(frame: &RaceFrame) -> u32 {
    frame.drivers.iter().map(|d| d.lap).max().unwrap_or(0)
}
