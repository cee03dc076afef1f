//! Playback clock over a finished race data artifact
//!
//! Maps playback time to frame indices and back, and keeps play/pause/seek
//! state. Fixed-rate and legacy artifacts use the uniform stride mapping
//! (`round(t * fps)`); union artifacts are irregular and are looked up by
//! frame timestamp instead.

use crate::model::{Alignment, RaceData, RaceFrame};
use crate::units::format_clock;
use serde::Serialize;
use std::time::Duration;

const MIN_SPEED: f64 = 0.1;
const MAX_SPEED: f64 = 16.0;

const MIN_TICK: Duration = Duration::from_nanos(1);
const MAX_TICK: Duration = Duration::from_secs(86_400);

/// Playback state for one loaded artifact
pub struct Playback {
    data: RaceData,
    current_frame: usize,
    playing: bool,
    playback_speed: f64,
}

impl Playback {
    pub fn new(data: RaceData) -> Self {
        Self {
            data,
            current_frame: 0,
            playing: false,
            playback_speed: 1.0,
        }
    }

    pub fn data(&self) -> &RaceData {
        &self.data
    }

    pub fn total_frames(&self) -> usize {
        self.data.frames.len()
    }

    pub fn fps(&self) -> f64 {
        self.data.fps
    }

    fn last_index(&self) -> usize {
        self.total_frames().saturating_sub(1)
    }

    fn is_time_indexed(&self) -> bool {
        self.data.alignment == Alignment::Union
    }

    /// Total playback length in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.total_frames() == 0 {
            return 0.0;
        }
        if self.is_time_indexed() {
            self.data
                .frames
                .last()
                .and_then(|f| f.time_sec)
                .unwrap_or(0.0)
        } else {
            self.total_frames() as f64 / self.data.fps
        }
    }

    /// Playback time of the current frame
    pub fn current_time(&self) -> f64 {
        if self.total_frames() == 0 {
            return 0.0;
        }
        if self.is_time_indexed() {
            self.current()
                .and_then(|f| f.time_sec)
                .unwrap_or(0.0)
        } else {
            self.current_frame as f64 / self.data.fps
        }
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn current(&self) -> Option<&RaceFrame> {
        self.data.frames.get(self.current_frame)
    }

    /// Frame index shown at playback time `t`
    pub fn frame_at_time(&self, t: f64) -> usize {
        if self.total_frames() == 0 {
            return 0;
        }
        if self.is_time_indexed() {
            // Last frame whose timestamp is not after t
            let after = self
                .data
                .frames
                .partition_point(|f| f.time_sec.unwrap_or(0.0) <= t);
            after.saturating_sub(1)
        } else {
            let target = (t * self.data.fps).round();
            if target.is_nan() || target <= 0.0 {
                0
            } else {
                (target as usize).min(self.last_index())
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback_speed
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Toggle play/pause. Starting playback from the last frame rewinds to
    /// the beginning first.
    pub fn toggle_play(&mut self) {
        if !self.playing && self.current_frame >= self.last_index() {
            self.current_frame = 0;
        }
        self.playing = !self.playing;
    }

    /// Jump to playback time `t` seconds
    pub fn seek(&mut self, t: f64) -> usize {
        self.current_frame = self.frame_at_time(t);
        self.current_frame
    }

    /// Jump to a frame index, clamped to the artifact
    pub fn seek_frame(&mut self, frame: usize) {
        self.current_frame = frame.min(self.last_index());
    }

    /// Move by `delta_secs` (negative steps back)
    pub fn step(&mut self, delta_secs: f64) -> usize {
        if self.is_time_indexed() {
            let target = self.current_time() + delta_secs;
            return self.seek(target);
        }
        let delta_frames = (delta_secs * self.data.fps).round() as i64;
        let next = (self.current_frame as i64 + delta_frames).clamp(0, self.last_index() as i64);
        self.current_frame = next as usize;
        self.current_frame
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.playback_speed = if speed.is_finite() {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            1.0
        };
    }

    /// Wall-clock time between frames at the current speed, kept within
    /// one nanosecond and one day
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / (self.data.fps * self.playback_speed))
            .unwrap_or(MAX_TICK)
            .clamp(MIN_TICK, MAX_TICK)
    }

    /// Advance one frame while playing. Stops (and returns `None`) at the end.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.playing {
            return None;
        }

        if self.current_frame >= self.last_index() {
            self.playing = false;
            return None;
        }

        self.current_frame += 1;
        Some(self.current_frame)
    }

    pub fn info(&self) -> PlaybackInfo {
        PlaybackInfo {
            total_frames: self.total_frames(),
            fps: self.data.fps,
            alignment: self.data.alignment,
            duration_secs: self.duration_secs(),
            current_frame: self.current_frame,
            current_time: self.current_time(),
            clock: format!(
                "{} / {}",
                format_clock(self.current_time()),
                format_clock(self.duration_secs())
            ),
            playing: self.playing,
            playback_speed: self.playback_speed,
        }
    }
}

/// Serializable playback snapshot
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackInfo {
    pub total_frames: usize,
    pub fps: f64,
    pub alignment: Alignment,
    pub duration_secs: f64,
    pub current_frame: usize,
    pub current_time: f64,
    pub clock: String,
    pub playing: bool,
    pub playback_speed: f64,
}
