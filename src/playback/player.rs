//! Transport control combined with position bookkeeping.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::playback::clock::PlaybackClock;
use crate::playback::repeat::{RepeatSection, RepeatState};
use crate::playback::transport::Transport;

/// Something the periodic poll changed on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Playback jumped back to the start of the repeat section.
    Looped,
    /// The end of the track was reached and playback stopped.
    Finished,
}

/// The loaded track, its position and the repeat state.
#[derive(Default)]
pub struct Player {
    transport: Option<Box<dyn Transport>>,
    clock: PlaybackClock,
    repeat: RepeatState,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("track", &self.track_name())
            .field("clock", &self.clock)
            .field("repeat", &self.repeat)
            .finish()
    }
}

fn to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or_default()
}

impl Player {
    /// A player with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current track. Position resets to zero, paused.
    pub fn load(&mut self, transport: Box<dyn Transport>) {
        if let Some(old) = self.transport.as_mut() {
            old.pause();
        }
        self.transport = Some(transport);
        self.clock.reset();
        self.repeat = RepeatState::Off;
    }

    /// Whether a track is loaded.
    pub fn is_loaded(&self) -> bool {
        self.transport.is_some()
    }

    /// Display name of the loaded track.
    pub fn track_name(&self) -> Option<&str> {
        self.transport.as_deref().map(|t| t.name())
    }

    /// Whether the position is advancing.
    pub const fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    /// Track length in seconds, when known.
    pub fn duration(&self) -> Option<f64> {
        self.transport.as_deref().and_then(|t| t.duration()).map(|d| d.as_secs_f64())
    }

    /// Current position in seconds, never past the end of the track.
    pub fn position(&self, now: Instant) -> f64 {
        let pos = self.clock.position(now).as_secs_f64();
        self.duration().map_or(pos, |d| pos.min(d))
    }

    /// Current repeat state.
    pub const fn repeat(&self) -> RepeatState {
        self.repeat
    }

    fn transport_mut(&mut self) -> Result<&mut Box<dyn Transport>> {
        self.transport.as_mut().ok_or_else(|| Error::audio("no audio loaded"))
    }

    fn at_end(&self, now: Instant) -> bool {
        let finished = self.transport.as_deref().is_some_and(|t| t.is_finished());
        let past_duration = self.duration().is_some_and(|d| self.position(now) >= d - 0.01);
        finished || past_duration
    }

    /// Start or resume playback.
    pub fn play(&mut self, now: Instant) -> Result<()> {
        self.transport_mut()?;
        if self.is_playing() {
            return Ok(());
        }

        if self.at_end(now) {
            self.seek_to(0.0, now)?;
        }
        if let Some(section) = self.repeat.section() {
            if !section.contains(self.position(now)) {
                self.seek_to(section.start(), now)?;
            }
        }

        self.transport_mut()?.play()?;
        self.clock.start(now);
        Ok(())
    }

    /// Pause playback. No-op when nothing is loaded.
    pub fn pause(&mut self, now: Instant) {
        if let Some(transport) = self.transport.as_mut() {
            transport.pause();
        }
        self.clock.pause(now);
    }

    /// Toggle between playing and paused.
    pub fn toggle(&mut self, now: Instant) -> Result<()> {
        if self.is_playing() {
            self.pause(now);
            Ok(())
        } else {
            self.play(now)
        }
    }

    /// Jump to `seconds`, clamped to the track.
    pub fn seek_to(&mut self, seconds: f64, now: Instant) -> Result<()> {
        let mut target = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        if let Some(d) = self.duration() {
            target = target.min(d);
        }
        let position = to_duration(target);
        self.transport_mut()?.seek(position)?;
        self.clock.seek(position, now);
        Ok(())
    }

    /// Move the position by `delta` seconds.
    pub fn seek_by(&mut self, delta: f64, now: Instant) -> Result<()> {
        let target = self.position(now) + delta;
        self.seek_to(target, now)
    }

    /// Loop `section`, or stop looping with `None`.
    pub fn set_repeat(&mut self, section: Option<RepeatSection>) {
        self.repeat = section.map_or(RepeatState::Off, RepeatState::Looping);
    }

    /// Advance the A/B repeat cycle at the current position.
    pub fn cycle_ab(&mut self, now: Instant) -> Result<RepeatState> {
        self.transport_mut()?;
        self.repeat = self.repeat.advance(self.position(now));
        Ok(self.repeat)
    }

    /// Timer-driven poll: loop the repeat section and stop at the end.
    pub fn tick(&mut self, now: Instant) -> Result<Option<TickEvent>> {
        if !self.is_playing() || self.transport.is_none() {
            return Ok(None);
        }

        let position = self.position(now);
        let finished = self.transport.as_deref().is_some_and(|t| t.is_finished());

        if let Some(section) = self.repeat.section() {
            if position >= section.end() || finished {
                self.seek_to(section.start(), now)?;
                if finished {
                    self.transport_mut()?.play()?;
                }
                return Ok(Some(TickEvent::Looped));
            }
        }

        if self.at_end(now) {
            let end = self.duration().unwrap_or(position);
            self.pause(now);
            self.clock.seek(to_duration(end), now);
            tracing::debug!("Reached end of track at {end:.2}s");
            return Ok(Some(TickEvent::Finished));
        }

        Ok(None)
    }
}
