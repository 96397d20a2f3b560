//! `[MM:SS.HH]` time markers.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Regex matching a leading `[MM:SS.HH]` marker on a lyric line.
#[allow(clippy::expect_used)]
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{2,}):(\d{2})\.(\d{2})\]").expect("valid regex: RE_TAG")
});

/// Regex matching a bare or bracketed marker, nothing else.
#[allow(clippy::expect_used)]
static RE_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[?(\d{1,}):(\d{2})\.(\d{2})\]?$").expect("valid regex: RE_EXACT")
});

const CENTI_EPSILON: f64 = 1e-6;

/// A playback position with centisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    centis: u64,
}

impl Timestamp {
    /// The start of the track.
    pub const ZERO: Self = Self { centis: 0 };

    /// Build a timestamp from whole centiseconds.
    #[must_use]
    pub const fn from_centis(centis: u64) -> Self {
        Self { centis }
    }

    /// Build a timestamp from seconds, truncating to the centisecond.
    ///
    /// A stamp never lands after the moment that was played. Negative and
    /// non-finite input clamps to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_seconds(seconds: f64) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self::ZERO;
        }
        // The epsilon absorbs binary representation error, e.g. 62.03 * 100.
        Self { centis: (seconds * 100.0 + CENTI_EPSILON).floor() as u64 }
    }

    /// Position in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_seconds(self) -> f64 {
        self.centis as f64 / 100.0
    }

    /// The bracketed `[MM:SS.HH]` form written to lyrics files.
    #[must_use]
    pub fn tag(self) -> String {
        format!("[{self}]")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.centis / 6000;
        let seconds = (self.centis / 100) % 60;
        let hundredths = self.centis % 100;
        write!(f, "{minutes:02}:{seconds:02}.{hundredths:02}")
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = RE_EXACT
            .captures(s.trim())
            .ok_or_else(|| Error::parse(format!("'{s}' is not a MM:SS.HH timestamp")))?;
        from_captures(&caps).ok_or_else(|| Error::parse(format!("'{s}' is out of range")))
    }
}

/// Split a leading `[MM:SS.HH]` marker off a lyric line.
///
/// Returns the timestamp and the remaining text with leading whitespace
/// removed, or `None` when the line has no valid marker.
pub fn split_tag(line: &str) -> Option<(Timestamp, &str)> {
    let caps = RE_TAG.captures(line)?;
    let ts = from_captures(&caps)?;
    let end = caps.get(0)?.end();
    Some((ts, line[end..].trim_start()))
}

fn from_captures(caps: &regex::Captures<'_>) -> Option<Timestamp> {
    let minutes: u64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(2)?.as_str().parse().ok()?;
    let hundredths: u64 = caps.get(3)?.as_str().parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    let centis = minutes.checked_mul(6000)?.checked_add(seconds * 100 + hundredths)?;
    Some(Timestamp::from_centis(centis))
}
