//! `play` command: drive a playback clock in real time
//!
//! Frames are emitted on a tokio interval of `1 / (fps * speed)` seconds
//! until the artifact ends or the cancellation token fires.

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tr_core::Playback;
use tracing::{debug, info};

/// Why a playback run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Reached the last frame
    Finished,
    Cancelled,
}

/// Play from the current frame, calling `on_frame` once per frame shown
/// (the starting frame included)
pub async fn run_playback<F>(
    playback: &mut Playback,
    cancel: CancellationToken,
    mut on_frame: F,
) -> PlayOutcome
where
    F: FnMut(&Playback),
{
    if playback.total_frames() == 0 {
        return PlayOutcome::Finished;
    }

    playback.play();
    let mut ticker = interval(playback.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(
        frames = playback.total_frames(),
        speed = playback.playback_speed(),
        "Playback task started"
    );

    let outcome = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break PlayOutcome::Cancelled,
            _ = ticker.tick() => {
                on_frame(playback);
                if playback.advance().is_none() {
                    break PlayOutcome::Finished;
                }
            }
        }
    };

    playback.pause();
    debug!(frame = playback.current_frame(), ?outcome, "Playback task ended");
    outcome
}
