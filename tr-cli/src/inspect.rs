//! `inspect` command: describe an artifact and the running order at a time

use serde::Serialize;
use tr_core::leaderboard::{leader_lap, standings, Standing};
use tr_core::units::format_clock;
use tr_core::{Alignment, Playback, RaceData};

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub fps: f64,
    pub alignment: Alignment,
    pub drivers: Vec<String>,
    pub total_frames: usize,
    pub duration_secs: f64,
    pub duration: String,
}

/// Running order at one playback instant
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame: usize,
    pub time_secs: f64,
    pub clock: String,
    pub leader_lap: u32,
    pub standings: Vec<Standing>,
}

pub fn summarize(data: &RaceData) -> ArtifactSummary {
    let playback = Playback::new(data.clone());
    ArtifactSummary {
        fps: data.fps,
        alignment: data.alignment,
        drivers: data.drivers.iter().map(|c| c.to_string()).collect(),
        total_frames: data.total_frames(),
        duration_secs: playback.duration_secs(),
        duration: format_clock(playback.duration_secs()),
    }
}

/// Seek `playback` to `t` seconds and describe the frame shown there.
/// `None` for an artifact without frames.
pub fn snapshot_at(playback: &mut Playback, t: f64) -> Option<Snapshot> {
    playback.seek(t);
    snapshot(playback)
}

pub fn snapshot(playback: &Playback) -> Option<Snapshot> {
    let frame = playback.current()?;
    Some(Snapshot {
        frame: playback.current_frame(),
        time_secs: playback.current_time(),
        clock: playback.info().clock,
        leader_lap: leader_lap(frame),
        standings: standings(frame),
    })
}

/// Human-readable summary block
pub fn render_summary(summary: &ArtifactSummary) -> String {
    format!(
        "alignment: {:?}\nfps:       {}\nframes:    {}\nduration:  {} ({:.1}s)\ndrivers:   {}",
        summary.alignment,
        summary.fps,
        summary.total_frames,
        summary.duration,
        summary.duration_secs,
        summary.drivers.join(" "),
    )
}

/// One leaderboard line per driver, capped at `top` rows
pub fn render_snapshot(snapshot: &Snapshot, top: usize) -> String {
    let mut out = format!(
        "[{}] frame {} lap {}",
        snapshot.clock, snapshot.frame, snapshot.leader_lap
    );
    for row in snapshot.standings.iter().take(top) {
        out.push_str(&format!(
            "\n  {:>2}. {:<4} {:<18} L{:<3} {:.3}",
            row.position,
            row.code.as_str(),
            row.name,
            row.lap,
            row.progress
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tr_core::model::{DriverCode, DriverFrameEntry, RaceFrame};

    fn data() -> RaceData {
        let ver = DriverCode::new("VER").unwrap();
        let ham = DriverCode::new("HAM").unwrap();
        RaceData {
            fps: 5.0,
            alignment: Alignment::FixedRate,
            drivers: vec![ver.clone(), ham.clone()],
            frames: (0..10)
                .map(|index| RaceFrame {
                    index,
                    time_sec: Some(index as f64 / 5.0),
                    drivers: vec![
                        DriverFrameEntry { code: ver.clone(), lap: 1, x: 0.1, y: 0.0 },
                        DriverFrameEntry { code: ham.clone(), lap: 2, x: 0.05, y: 0.0 },
                    ],
                })
                .collect(),
        }
    }

    #[test]
    fn test_summary() {
        let summary = summarize(&data());
        assert_eq!(summary.total_frames, 10);
        assert_eq!(summary.duration_secs, 2.0);
        assert_eq!(summary.duration, "00:02");
        assert_eq!(summary.drivers, vec!["VER", "HAM"]);
        assert!(render_summary(&summary).contains("VER HAM"));
    }

    #[test]
    fn test_snapshot_orders_by_lap() {
        let mut playback = Playback::new(data());
        let snap = snapshot_at(&mut playback, 1.0).unwrap();
        assert_eq!(snap.frame, 5);
        assert_eq!(snap.leader_lap, 2);
        assert_eq!(snap.standings[0].code.as_str(), "HAM");

        let text = render_snapshot(&snap, 1);
        assert!(text.contains("Lewis Hamilton"));
        assert!(!text.contains("Max Verstappen"));
    }

    #[test]
    fn test_empty_artifact_has_no_snapshot() {
        let empty = RaceData {
            frames: Vec::new(),
            ..data()
        };
        let mut playback = Playback::new(empty);
        assert!(snapshot_at(&mut playback, 0.0).is_none());
    }
}
