//! Wall-clock playback position.
//!
//! The audio sink does not report where it is, so the position is derived
//! from a stored baseline plus the time elapsed since playback last started.

use std::time::{Duration, Instant};

/// Tracks the playback position from wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    baseline: Duration,
    started: Option<Instant>,
}

impl PlaybackClock {
    /// A stopped clock at position zero.
    pub const fn new() -> Self {
        Self {
            baseline: Duration::ZERO,
            started: None,
        }
    }

    /// Start counting from `now`. No-op if already running.
    pub fn start(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    /// Stop counting, folding the elapsed time into the baseline.
    pub fn pause(&mut self, now: Instant) {
        if let Some(start) = self.started.take() {
            self.baseline += now.saturating_duration_since(start);
        }
    }

    /// Jump to `position`, keeping the running state.
    pub fn seek(&mut self, position: Duration, now: Instant) {
        self.baseline = position;
        if self.started.is_some() {
            self.started = Some(now);
        }
    }

    /// Position at `now`.
    pub fn position(&self, now: Instant) -> Duration {
        self.started.map_or(self.baseline, |start| {
            self.baseline + now.saturating_duration_since(start)
        })
    }

    /// Whether the clock is counting.
    pub const fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Stop and rewind to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
