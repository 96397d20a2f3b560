//! Looping a span of the track.

use crate::lyrics::Timestamp;

/// A span of the track played in a loop, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatSection {
    start: f64,
    end: f64,
}

impl RepeatSection {
    /// Build a section from two points in either order.
    ///
    /// Returns `None` when the points are equal or not finite.
    pub fn between(a: f64, b: f64) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() || (a - b).abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            start: a.min(b).max(0.0),
            end: a.max(b),
        })
    }

    /// Start of the section.
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// End of the section.
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Whether `position` lies inside the section.
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position < self.end
    }

    /// Short `start-end` description for the status bar.
    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            Timestamp::from_seconds(self.start),
            Timestamp::from_seconds(self.end)
        )
    }
}

/// A/B repeat progression.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RepeatState {
    /// No repeat.
    #[default]
    Off,
    /// Point A has been marked, waiting for B.
    Marked(f64),
    /// Looping between two points.
    Looping(RepeatSection),
}

impl RepeatState {
    /// Advance the A/B cycle with the current position: mark A, then set B
    /// and start looping, then clear.
    #[must_use]
    pub fn advance(self, position: f64) -> Self {
        match self {
            Self::Off => Self::Marked(position),
            Self::Marked(a) => RepeatSection::between(a, position).map_or(Self::Off, Self::Looping),
            Self::Looping(_) => Self::Off,
        }
    }

    /// The active looping section, if any.
    pub const fn section(&self) -> Option<RepeatSection> {
        match self {
            Self::Looping(s) => Some(*s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn section_orders_points() {
        let s = RepeatSection::between(12.0, 4.5).unwrap();
        assert!((s.start() - 4.5).abs() < f64::EPSILON);
        assert!((s.end() - 12.0).abs() < f64::EPSILON);
        assert!(s.contains(4.5));
        assert!(!s.contains(12.0));
        assert_eq!(s.label(), "00:04.50-00:12.00");
    }

    #[test]
    fn empty_section_is_rejected() {
        assert!(RepeatSection::between(3.0, 3.0).is_none());
        assert!(RepeatSection::between(f64::NAN, 3.0).is_none());
    }

    #[test]
    fn ab_cycle() {
        let state = RepeatState::Off.advance(10.0);
        assert_eq!(state, RepeatState::Marked(10.0));

        let state = state.advance(4.0);
        let section = state.section().unwrap();
        assert!((section.start() - 4.0).abs() < f64::EPSILON);

        assert_eq!(state.advance(20.0), RepeatState::Off);
    }

    #[test]
    fn marking_b_at_a_cancels() {
        assert_eq!(RepeatState::Marked(5.0).advance(5.0), RepeatState::Off);
    }
}
