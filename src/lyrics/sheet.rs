//! The lyric sheet: loaded lines plus the timestamps recorded against them.

use std::path::{Path, PathBuf};

use crate::constants::lyrics::SEPARATOR_PREFIX;
use crate::error::{Error, Result};
use crate::lyrics::timestamp::{split_tag, Timestamp};

/// Ordered lyric lines with per-line timestamps.
///
/// Line 0 is always a blank leading entry. Text never changes after loading;
/// only the timestamps do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricSheet {
    lines: Vec<String>,
    stamps: Vec<Option<Timestamp>>,
    original: Vec<Option<Timestamp>>,
    source: Option<PathBuf>,
}

impl Default for LyricSheet {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl LyricSheet {
    /// Build a sheet from raw lyrics text.
    ///
    /// Blank lines and `---` separators are skipped. A leading `[MM:SS.HH]`
    /// marker is imported as the line's timestamp.
    pub fn from_text(text: &str) -> Self {
        let mut lines = vec![String::new()];
        let mut stamps = vec![None];

        for raw in text.lines() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(SEPARATOR_PREFIX) {
                continue;
            }

            let (stamp, body) = match split_tag(trimmed) {
                Some((ts, rest)) => (Some(ts), rest.trim_end()),
                None => (None, trimmed),
            };

            // An LRC file already carries its own blank leading entry.
            if lines.len() == 1 && stamps[0].is_none() && body.is_empty() && stamp.is_some() {
                stamps[0] = stamp;
                continue;
            }

            lines.push(body.to_string());
            stamps.push(stamp);
        }

        Self {
            original: stamps.clone(),
            lines,
            stamps,
            source: None,
        }
    }

    /// Load a sheet from a UTF-8 text or LRC file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        let mut sheet = Self::from_text(&text);
        sheet.source = Some(path.to_path_buf());
        tracing::info!(
            "Loaded {} lyric lines ({} stamped) from {}",
            sheet.len() - 1,
            sheet.stamped_count(),
            path.display()
        );
        Ok(sheet)
    }

    /// Path the sheet was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of lines, the blank leading entry included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// A sheet always holds the blank leading entry.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of line `index`.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Recorded timestamp of line `index`.
    pub fn timestamp(&self, index: usize) -> Option<Timestamp> {
        self.stamps.get(index).copied().flatten()
    }

    /// Record a timestamp for line `index`.
    pub fn set_timestamp(&mut self, index: usize, ts: Timestamp) -> Result<()> {
        *self.slot(index)? = Some(ts);
        Ok(())
    }

    /// Remove the timestamp of line `index`.
    pub fn clear_timestamp(&mut self, index: usize) -> Result<()> {
        *self.slot(index)? = None;
        Ok(())
    }

    /// Put back the timestamp line `index` had when the sheet was loaded.
    pub fn restore(&mut self, index: usize) -> Result<()> {
        let original = self.original.get(index).copied().flatten();
        *self.slot(index)? = original;
        Ok(())
    }

    /// Whether line `index` differs from its loaded state.
    pub fn is_modified(&self, index: usize) -> bool {
        self.stamps.get(index) != self.original.get(index)
    }

    /// Drop every recorded timestamp.
    pub fn clear_all(&mut self) {
        self.stamps.iter_mut().for_each(|s| *s = None);
    }

    /// Number of lines carrying a timestamp.
    pub fn stamped_count(&self) -> usize {
        self.stamps.iter().filter(|s| s.is_some()).count()
    }

    /// Find the first line after `index` whose timestamp is later than the
    /// timestamp of line `index`.
    pub fn next_timestamp_after(&self, index: usize) -> Option<(usize, Timestamp)> {
        let floor = self.timestamp(index);
        self.stamps
            .iter()
            .enumerate()
            .skip(index + 1)
            .find_map(|(i, s)| match (s, floor) {
                (Some(ts), Some(f)) if *ts > f => Some((i, *ts)),
                (Some(ts), None) => Some((i, *ts)),
                _ => None,
            })
    }

    /// The last line, in sheet order, whose timestamp is at or before `position`.
    pub fn line_at(&self, position: Timestamp) -> Option<usize> {
        self.stamps
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.filter(|ts| *ts <= position).map(|_| i))
            .last()
    }

    /// Render line `index` as it appears in the output file.
    pub fn render_line(&self, index: usize) -> Option<String> {
        let text = self.text(index)?;
        Some(match self.timestamp(index) {
            Some(ts) if text.is_empty() => ts.tag(),
            Some(ts) => format!("{} {text}", ts.tag()),
            None => text.to_string(),
        })
    }

    /// The complete output file contents.
    pub fn to_lrc(&self) -> String {
        let mut out = String::new();
        for i in 0..self.len() {
            if let Some(line) = self.render_line(i) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// Write the output file to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_lrc()).map_err(|e| Error::io(e, path.to_path_buf()))?;
        tracing::info!("Saved {} lines to {}", self.len(), path.display());
        Ok(())
    }

    fn slot(&mut self, index: usize) -> Result<&mut Option<Timestamp>> {
        let len = self.stamps.len();
        self.stamps.get_mut(index).ok_or(Error::LineOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn plain_text_gets_blank_leading_line() {
        let sheet = LyricSheet::from_text("First line\n\n  Second line  \n");
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.text(0), Some(""));
        assert_eq!(sheet.text(1), Some("First line"));
        assert_eq!(sheet.text(2), Some("Second line"));
        assert_eq!(sheet.stamped_count(), 0);
        assert!((0..sheet.len()).all(|i| !sheet.is_modified(i)));
    }

    #[test]
    fn separators_are_skipped() {
        let sheet = LyricSheet::from_text("Verse\n--- chorus ---\nChorus");
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.text(2), Some("Chorus"));
    }

    #[test]
    fn existing_markers_are_imported() {
        let sheet = LyricSheet::from_text("[00:00.00]\n[00:05.10]Hello\n[00:09.80] World\nUntimed");
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.timestamp(0), Some(Timestamp::ZERO));
        assert_eq!(sheet.text(1), Some("Hello"));
        assert_eq!(sheet.timestamp(1), Some(ts("00:05.10")));
        assert_eq!(sheet.text(2), Some("World"));
        assert_eq!(sheet.timestamp(3), None);
    }

    #[test]
    fn set_clear_and_restore() {
        let mut sheet = LyricSheet::from_text("[00:05.00] A\nB");
        sheet.set_timestamp(1, ts("00:06.00")).unwrap();
        sheet.set_timestamp(2, ts("00:08.00")).unwrap();
        assert!(sheet.is_modified(1));
        assert!(sheet.is_modified(2));

        sheet.restore(1).unwrap();
        assert_eq!(sheet.timestamp(1), Some(ts("00:05.00")));
        assert!(!sheet.is_modified(1));

        sheet.restore(2).unwrap();
        assert_eq!(sheet.timestamp(2), None);

        sheet.clear_timestamp(1).unwrap();
        assert!(sheet.is_modified(1));
        assert!(sheet.set_timestamp(9, Timestamp::ZERO).is_err());
    }

    #[test]
    fn next_timestamp_skips_earlier_and_unstamped_lines() {
        let mut sheet = LyricSheet::from_text("A\nB\nC\nD");
        sheet.set_timestamp(1, ts("00:10.00")).unwrap();
        sheet.set_timestamp(2, ts("00:08.00")).unwrap();
        sheet.set_timestamp(4, ts("00:20.00")).unwrap();

        assert_eq!(sheet.next_timestamp_after(1), Some((4, ts("00:20.00"))));
        assert_eq!(sheet.next_timestamp_after(0), Some((1, ts("00:10.00"))));
        assert_eq!(sheet.next_timestamp_after(4), None);
    }

    #[test]
    fn line_at_finds_last_started_line() {
        let sheet = LyricSheet::from_text("[00:01.00] A\n[00:05.00] B\nC\n[00:09.00] D");
        assert_eq!(sheet.line_at(ts("00:00.50")), None);
        assert_eq!(sheet.line_at(ts("00:01.00")), Some(1));
        assert_eq!(sheet.line_at(ts("00:07.00")), Some(2));
        assert_eq!(sheet.line_at(ts("01:00.00")), Some(4));
    }

    #[test]
    fn output_format() {
        let mut sheet = LyricSheet::from_text("Hello\nWorld");
        sheet.set_timestamp(0, Timestamp::ZERO).unwrap();
        sheet.set_timestamp(1, ts("00:03.25")).unwrap();
        assert_eq!(sheet.to_lrc(), "[00:00.00]\n[00:03.25] Hello\nWorld\n");
    }

    #[test]
    fn clear_all_drops_every_timestamp() {
        let mut sheet = LyricSheet::from_text("[00:01.00] A\n[00:02.00] B");
        sheet.clear_all();
        assert_eq!(sheet.stamped_count(), 0);
        assert!(sheet.is_modified(1));
        assert!(sheet.is_modified(2));

        sheet.restore(2).unwrap();
        assert_eq!(sheet.timestamp(2), Some(ts("00:02.00")));
    }

    #[test]
    fn leading_bare_marker_stamps_the_blank_entry() {
        let sheet = LyricSheet::from_text("[00:03.00]\nA");
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.text(0), Some(""));
        assert_eq!(sheet.timestamp(0), Some(ts("00:03.00")));
        assert_eq!(sheet.text(1), Some("A"));
        assert_eq!(sheet.timestamp(1), None);
        assert!(!sheet.is_modified(0));
    }

    #[test]
    fn later_bare_marker_is_its_own_line() {
        let sheet = LyricSheet::from_text("A\n[00:07.00]\nB");
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.timestamp(0), None);
        assert_eq!(sheet.text(2), Some(""));
        assert_eq!(sheet.timestamp(2), Some(ts("00:07.00")));
    }
}
