use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;
use arboard::Clipboard;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{expand_path, Config};
use crate::constants::lyrics::OUTPUT_EXTENSION;
use crate::error::{Error, Result};
use crate::input::{action_for_key, parse_command, Action, Command, Step};
use crate::lyrics::{LyricSheet, Timestamp};
use crate::playback::{Player, RepeatSection, RepeatState, RodioTransport, TickEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,   // Lyrics list with transport keys
    Command,  // Typing a `:` command
}

pub struct App {
    pub mode: AppMode,
    pub sheet: LyricSheet,
    pub cursor: usize,
    pub list_state: ListState,
    pub player: Player,
    pub follow: bool,
    pub command_buffer: String,
    pub config: Config,
    pub output_path: Option<PathBuf>,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    pub notice: Option<String>,
    pub show_help: bool,
    pub pending_quit_confirmation: bool,
    output_explicit: bool,
    dirty: bool,
    should_quit: bool,
}

/// Default output file for a lyrics file: same name, `.lrc` extension.
pub fn default_output_path(lyrics_path: &Path) -> PathBuf {
    lyrics_path.with_extension(OUTPUT_EXTENSION)
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            mode: AppMode::Normal,
            sheet: LyricSheet::default(),
            cursor: 0,
            list_state,
            player: Player::new(),
            follow: true,
            command_buffer: String::new(),
            config,
            output_path: None,
            error_message: None,
            status_message: None,
            notice: None,
            show_help: false,
            pending_quit_confirmation: false,
            output_explicit: false,
            dirty: false,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Whether timestamps changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write output to `path` instead of the path derived from the lyrics file.
    pub fn set_output_path(&mut self, path: PathBuf) {
        self.output_path = Some(path);
        self.output_explicit = true;
    }

    /// Replace the sheet with the contents of a lyrics file.
    ///
    /// Refuses while there are unsaved timestamps.
    pub fn load_lyrics(&mut self, path: &Path) -> Result<()> {
        self.open_lyrics(path, false)
    }

    /// Replace the sheet, dropping unsaved timestamps only when `discard` is set.
    pub fn open_lyrics(&mut self, path: &Path, discard: bool) -> Result<()> {
        if self.dirty && !discard {
            return Err(Error::Msg(
                "Unsaved timestamps. Save with :w first, or use :lyrics! <path> to discard them".to_string(),
            ));
        }
        let sheet = LyricSheet::load(path)?;
        if !self.output_explicit {
            self.output_path = Some(default_output_path(path));
        }
        self.replace_sheet(sheet);
        self.notice = Some(format!(
            "Loaded {} lines from {}",
            self.sheet.len() - 1,
            path.display()
        ));
        Ok(())
    }

    /// Install a sheet, resetting the cursor and dirty state.
    pub fn replace_sheet(&mut self, sheet: LyricSheet) {
        self.sheet = sheet;
        self.dirty = false;
        self.follow = true;
        self.set_cursor(0);
    }

    /// Open an audio file on the default output device.
    pub fn open_audio(&mut self, path: &Path) -> Result<()> {
        let transport = RodioTransport::open(path)?;
        self.player.load(Box::new(transport));
        self.notice = Some(format!("Loaded audio {}", path.display()));
        Ok(())
    }

    /// Playback position in seconds.
    pub fn position(&self, now: Instant) -> f64 {
        self.player.position(now)
    }

    // Cursor moves driven by follow mode keep follow on.
    fn set_cursor(&mut self, line: usize) {
        let last = self.sheet.len().saturating_sub(1);
        self.cursor = line.min(last);
        self.list_state.select(Some(self.cursor));
    }

    // Cursor moves driven by the user switch to manual mode.
    fn move_cursor(&mut self, line: usize) {
        self.follow = false;
        self.set_cursor(line);
    }

    fn sync_follow(&mut self, now: Instant) {
        if !self.follow {
            return;
        }
        let position = Timestamp::from_seconds(self.position(now));
        if let Some(line) = self.sheet.line_at(position) {
            self.set_cursor(line);
        }
    }

    /// Timer-driven update; call once per event loop iteration.
    pub fn tick(&mut self, now: Instant) {
        let event = self.player.tick(now).unwrap_or_else(|e| {
            self.report(e);
            None
        });
        if event == Some(TickEvent::Finished) {
            self.notice = Some("End of track".to_string());
        }
        // The final sync puts the cursor on the line playing at the end.
        if self.player.is_playing() || event == Some(TickEvent::Finished) {
            self.sync_follow(now);
        }
    }

    fn report(&mut self, err: Error) {
        tracing::warn!("{err}");
        self.error_message = Some(err.to_string());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.handle_key_at(key, Instant::now());
    }

    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) {
        // Check if we need to dismiss an error message first
        if self.error_message.is_some() {
            if key.code == KeyCode::Esc || key.code == KeyCode::Enter {
                self.error_message = None;
            }
            return; // Don't process other keys while error is displayed
        }
        if self.pending_quit_confirmation {
            match key.code {
                KeyCode::Char('y' | 'Y') => {
                    self.pending_quit_confirmation = false;
                    self.status_message = None;
                    self.quit();
                }
                KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                    self.pending_quit_confirmation = false;
                    self.status_message = None;
                }
                _ => {}
            }
            return;
        }
        if self.status_message.is_some() {
            if key.code == KeyCode::Esc || key.code == KeyCode::Enter {
                self.status_message = None;
            }
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return; // Don't process other keys while help is displayed
        }

        match self.mode {
            AppMode::Command => self.handle_command_input(key, now),
            AppMode::Normal => {
                if let Some(action) = action_for_key(key) {
                    self.apply(action, now);
                }
            }
        }
    }

    fn handle_command_input(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.command_buffer);
                self.mode = AppMode::Normal;
                match parse_command(&line) {
                    Ok(command) => self.execute_command(command, now),
                    Err(msg) => self.report(Error::Msg(msg)),
                }
            }
            KeyCode::Backspace => {
                if self.command_buffer.pop().is_none() {
                    self.mode = AppMode::Normal;
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
            }
            _ => {}
        }
    }

    /// Perform a main-view action.
    pub fn apply(&mut self, action: Action, now: Instant) {
        self.notice = None;
        let result = match action {
            Action::TogglePlay => self.player.toggle(now),
            Action::Stamp => self.stamp_current_line(now),
            Action::LineUp => {
                self.move_cursor(self.cursor.saturating_sub(1));
                Ok(())
            }
            Action::LineDown => {
                self.move_cursor(self.cursor + 1);
                Ok(())
            }
            Action::FirstLine => {
                self.move_cursor(0);
                Ok(())
            }
            Action::LastLine => {
                self.move_cursor(self.sheet.len());
                Ok(())
            }
            Action::SeekBack(step) => self.seek_by(-self.step(step), now),
            Action::SeekForward(step) => self.seek_by(self.step(step), now),
            Action::JumpToLine => self.jump_to_line(now),
            Action::ClearLine => self.clear_line(),
            Action::RestoreLine => self.restore_line(),
            Action::RepeatLine => self.repeat_line(),
            Action::RepeatAb => self.repeat_ab(now),
            Action::ToggleFollow => {
                self.toggle_follow(now);
                Ok(())
            }
            Action::Save => self.save(None),
            Action::EnterCommand => {
                self.mode = AppMode::Command;
                self.command_buffer.clear();
                Ok(())
            }
            Action::Help => {
                self.show_help = true;
                Ok(())
            }
            Action::Quit => {
                self.request_quit();
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(e);
        }
    }

    /// Run a parsed `:` command.
    pub fn execute_command(&mut self, command: Command, now: Instant) {
        self.notice = None;
        let result = match command {
            Command::Write(path) => self.save(path.as_deref()),
            Command::WriteQuit => self.save(None).map(|()| self.quit()),
            Command::Quit => {
                self.request_quit();
                Ok(())
            }
            Command::ForceQuit => {
                self.quit();
                Ok(())
            }
            Command::OpenAudio(path) => self.open_audio(&expand_path(&path)),
            Command::OpenLyrics { path, discard } => self.open_lyrics(&expand_path(&path), discard),
            Command::SetTime(ts) => self.set_line_timestamp(ts),
            Command::Clear => self.clear_line(),
            Command::Reset => {
                self.sheet.clear_all();
                self.dirty = true;
                self.notice = Some("Cleared all timestamps".to_string());
                Ok(())
            }
            Command::Copy => self.copy_to_clipboard(),
            Command::Follow => {
                self.toggle_follow(now);
                Ok(())
            }
            Command::Help => {
                self.show_help = true;
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(e);
        }
    }

    fn step(&self, step: Step) -> f64 {
        match step {
            Step::Coarse => self.config.seek_step,
            Step::Fine => self.config.fine_step,
        }
    }

    fn seek_by(&mut self, delta: f64, now: Instant) -> Result<()> {
        self.player.seek_by(delta, now)?;
        self.sync_follow(now);
        Ok(())
    }

    /// Record the playback position on the cursor line and move to the next line.
    pub fn stamp_current_line(&mut self, now: Instant) -> Result<()> {
        if !self.player.is_loaded() {
            return Err(Error::audio("no audio loaded"));
        }
        let ts = Timestamp::from_seconds(self.position(now));
        self.sheet.set_timestamp(self.cursor, ts)?;
        self.dirty = true;
        tracing::debug!("Stamped line {} at {ts}", self.cursor);
        self.move_cursor(self.cursor + 1);
        Ok(())
    }

    fn set_line_timestamp(&mut self, ts: Timestamp) -> Result<()> {
        self.sheet.set_timestamp(self.cursor, ts)?;
        self.dirty = true;
        Ok(())
    }

    fn clear_line(&mut self) -> Result<()> {
        if self.sheet.timestamp(self.cursor).is_some() {
            self.sheet.clear_timestamp(self.cursor)?;
            self.dirty = true;
        }
        Ok(())
    }

    fn restore_line(&mut self) -> Result<()> {
        if self.sheet.is_modified(self.cursor) {
            self.sheet.restore(self.cursor)?;
            self.dirty = true;
        }
        Ok(())
    }

    fn jump_to_line(&mut self, now: Instant) -> Result<()> {
        match self.sheet.timestamp(self.cursor) {
            Some(ts) => self.player.seek_to(ts.as_seconds(), now),
            None => {
                self.notice = Some("Line has no timestamp".to_string());
                Ok(())
            }
        }
    }

    /// Loop from the cursor line's timestamp to the next later timestamp, or
    /// to the end of the track. Pressing again stops looping.
    fn repeat_line(&mut self) -> Result<()> {
        if !self.player.is_loaded() {
            return Err(Error::audio("no audio loaded"));
        }
        if self.player.repeat() != RepeatState::Off {
            self.player.set_repeat(None);
            self.notice = Some("Repeat off".to_string());
            return Ok(());
        }

        let Some(start) = self.sheet.timestamp(self.cursor) else {
            self.notice = Some("Line has no timestamp to repeat from".to_string());
            return Ok(());
        };
        let end = self
            .sheet
            .next_timestamp_after(self.cursor)
            .map(|(_, ts)| ts.as_seconds())
            .or_else(|| self.player.duration());

        match end.and_then(|end| RepeatSection::between(start.as_seconds(), end)) {
            Some(section) => {
                self.notice = Some(format!("Repeating {}", section.label()));
                self.player.set_repeat(Some(section));
            }
            None => self.notice = Some("No later timestamp to repeat to".to_string()),
        }
        Ok(())
    }

    fn repeat_ab(&mut self, now: Instant) -> Result<()> {
        let state = self.player.cycle_ab(now)?;
        self.notice = Some(match state {
            RepeatState::Off => "Repeat off".to_string(),
            RepeatState::Marked(a) => format!("Repeat from {} (press b again to set end)", Timestamp::from_seconds(a)),
            RepeatState::Looping(section) => format!("Repeating {}", section.label()),
        });
        Ok(())
    }

    fn toggle_follow(&mut self, now: Instant) {
        self.follow = !self.follow;
        self.sync_follow(now);
        self.notice = Some(if self.follow { "Follow on" } else { "Follow off" }.to_string());
    }

    /// Save to `path`, or to the current output path.
    pub fn save(&mut self, path: Option<&str>) -> Result<()> {
        let target = match path {
            Some(p) => expand_path(p),
            None => self.output_path.clone().ok_or_else(|| {
                Error::Msg("No output file yet; use :w <path>".to_string())
            })?,
        };
        self.sheet.save(&target)?;
        self.dirty = false;
        self.notice = Some(format!("Saved {} lines to {}", self.sheet.len(), target.display()));
        self.output_path = Some(target);
        Ok(())
    }

    fn copy_to_clipboard(&mut self) -> Result<()> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(self.sheet.to_lrc())?;
        self.notice = Some("Copied lyrics to clipboard".to_string());
        Ok(())
    }

    fn request_quit(&mut self) {
        if self.dirty {
            self.pending_quit_confirmation = true;
            self.status_message = Some("Unsaved timestamps. Quit without saving? (y/n)".to_string());
        } else {
            self.quit();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::playback::transport::fake::FakeTransport;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn app_with(text: &str, duration: Option<f64>) -> (App, FakeTransport) {
        let mut app = App::new(Config::default());
        app.replace_sheet(LyricSheet::from_text(text));
        let fake = FakeTransport::new(duration.map(Duration::from_secs_f64));
        app.player.load(Box::new(fake.clone()));
        (app, fake)
    }

    fn type_command(app: &mut App, cmd: &str, now: Instant) {
        app.handle_key_at(key(KeyCode::Char(':')), now);
        for c in cmd.chars() {
            app.handle_key_at(key(KeyCode::Char(c)), now);
        }
        app.handle_key_at(key(KeyCode::Enter), now);
    }

    #[test]
    fn stamping_records_position_and_advances() {
        let (mut app, _fake) = app_with("One\nTwo\nThree", Some(120.0));
        let t0 = Instant::now();
        app.player.seek_to(12.34, t0).unwrap();

        app.handle_key_at(key(KeyCode::Enter), t0);
        assert_eq!(app.sheet.timestamp(0).unwrap().to_string(), "00:12.34");
        assert_eq!(app.cursor, 1);
        assert!(!app.follow);
        assert!(app.is_dirty());
    }

    #[test]
    fn stamping_last_line_stays_on_it() {
        let (mut app, _fake) = app_with("Only", None);
        let t0 = Instant::now();
        app.apply(Action::LastLine, t0);
        app.apply(Action::Stamp, t0);
        app.apply(Action::Stamp, t0);
        assert_eq!(app.cursor, 1);
        assert_eq!(app.sheet.stamped_count(), 1);
    }

    #[test]
    fn navigation_is_clamped() {
        let (mut app, _fake) = app_with("A\nB", None);
        let t0 = Instant::now();
        app.apply(Action::LineUp, t0);
        assert_eq!(app.cursor, 0);
        app.apply(Action::LastLine, t0);
        assert_eq!(app.cursor, 2);
        app.apply(Action::LineDown, t0);
        assert_eq!(app.cursor, 2);
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn follow_mode_tracks_playing_line() {
        let (mut app, _fake) = app_with("[00:01.00] A\n[00:04.00] B\n[00:08.00] C", Some(60.0));
        let t0 = Instant::now();
        app.apply(Action::TogglePlay, t0);
        app.tick(t0 + Duration::from_secs(5));
        assert_eq!(app.cursor, 2);

        app.apply(Action::LineUp, t0 + Duration::from_secs(5));
        app.tick(t0 + Duration::from_secs(9));
        assert_eq!(app.cursor, 1);

        app.apply(Action::ToggleFollow, t0 + Duration::from_secs(9));
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn seek_keys_use_configured_steps() {
        let (mut app, fake) = app_with("A", Some(60.0));
        let t0 = Instant::now();
        app.apply(Action::SeekForward(Step::Coarse), t0);
        app.apply(Action::SeekBack(Step::Fine), t0);
        assert!((app.position(t0) - 4.0).abs() < 1e-9);
        assert_eq!(fake.last_seek(), Some(Duration::from_secs(4)));
    }

    #[test]
    fn jump_to_line_seeks_to_its_timestamp() {
        let (mut app, _fake) = app_with("[00:07.50] A", Some(60.0));
        let t0 = Instant::now();
        app.apply(Action::LastLine, t0);
        app.apply(Action::JumpToLine, t0);
        assert!((app.position(t0) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn repeat_line_loops_until_next_timestamp() {
        let (mut app, _fake) = app_with("[00:02.00] A\nB\n[00:06.00] C", Some(60.0));
        let t0 = Instant::now();
        app.apply(Action::LineDown, t0);
        app.apply(Action::RepeatLine, t0);
        let section = app.player.repeat().section().unwrap();
        assert!((section.start() - 2.0).abs() < 1e-9);
        assert!((section.end() - 6.0).abs() < 1e-9);

        app.apply(Action::RepeatLine, t0);
        assert_eq!(app.player.repeat(), RepeatState::Off);
    }

    #[test]
    fn repeat_last_line_runs_to_track_end() {
        let (mut app, _fake) = app_with("[00:02.00] A", Some(30.0));
        let t0 = Instant::now();
        app.apply(Action::LastLine, t0);
        app.apply(Action::RepeatLine, t0);
        let section = app.player.repeat().section().unwrap();
        assert!((section.end() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn repeat_without_timestamp_only_notifies() {
        let (mut app, _fake) = app_with("A", Some(30.0));
        app.apply(Action::RepeatLine, Instant::now());
        assert_eq!(app.player.repeat(), RepeatState::Off);
        assert!(app.notice.is_some());
        assert!(app.error_message.is_none());
    }

    #[test]
    fn playing_without_audio_shows_blocking_error() {
        let mut app = App::new(Config::default());
        let t0 = Instant::now();
        app.handle_key_at(key(KeyCode::Char(' ')), t0);
        assert!(app.error_message.is_some());

        // Keys are swallowed until the dialog is dismissed.
        app.handle_key_at(key(KeyCode::Down), t0);
        assert_eq!(app.cursor, 0);
        app.handle_key_at(key(KeyCode::Esc), t0);
        assert!(app.error_message.is_none());
    }

    #[test]
    fn clear_and_restore_line() {
        let (mut app, _fake) = app_with("[00:03.00] A", None);
        let t0 = Instant::now();
        app.apply(Action::LastLine, t0);
        app.apply(Action::ClearLine, t0);
        assert_eq!(app.sheet.timestamp(1), None);
        app.apply(Action::RestoreLine, t0);
        assert_eq!(app.sheet.timestamp(1).unwrap().to_string(), "00:03.00");
    }

    #[test]
    fn set_time_and_reset_commands() {
        let (mut app, _fake) = app_with("A\nB", None);
        let t0 = Instant::now();
        type_command(&mut app, "t 00:42.10", t0);
        assert_eq!(app.sheet.timestamp(0).unwrap().to_string(), "00:42.10");

        type_command(&mut app, "reset", t0);
        assert_eq!(app.sheet.stamped_count(), 0);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn bad_command_shows_error() {
        let (mut app, _fake) = app_with("A", None);
        type_command(&mut app, "bogus", Instant::now());
        assert!(app.error_message.as_deref().unwrap().contains("bogus"));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn quit_with_unsaved_changes_asks_first() {
        let (mut app, _fake) = app_with("A", None);
        let t0 = Instant::now();
        app.apply(Action::Stamp, t0);
        app.apply(Action::Quit, t0);
        assert!(!app.should_quit());
        assert!(app.pending_quit_confirmation);

        app.handle_key_at(key(KeyCode::Char('n')), t0);
        assert!(!app.should_quit());

        app.apply(Action::Quit, t0);
        app.handle_key_at(key(KeyCode::Char('y')), t0);
        assert!(app.should_quit());
    }

    #[test]
    fn force_quit_skips_confirmation() {
        let (mut app, _fake) = app_with("A", None);
        let t0 = Instant::now();
        app.apply(Action::Stamp, t0);
        type_command(&mut app, "q!", t0);
        assert!(app.should_quit());
    }

    #[test]
    fn save_writes_output_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let lyrics = dir.path().join("song.txt");
        std::fs::write(&lyrics, "Hello\nWorld\n").unwrap();

        let mut app = App::new(Config::default());
        app.load_lyrics(&lyrics).unwrap();
        assert_eq!(app.output_path, Some(dir.path().join("song.lrc")));

        app.player.load(Box::new(FakeTransport::new(None)));
        let t0 = Instant::now();
        app.player.seek_to(1.5, t0).unwrap();
        app.apply(Action::LineDown, t0);
        app.apply(Action::Stamp, t0);
        app.apply(Action::Save, t0);

        assert!(!app.is_dirty());
        let written = std::fs::read_to_string(dir.path().join("song.lrc")).unwrap();
        assert_eq!(written, "\n[00:01.50] Hello\nWorld\n");
    }

    #[test]
    fn save_without_output_path_is_an_error() {
        let (mut app, _fake) = app_with("A", None);
        app.apply(Action::Save, Instant::now());
        assert!(app.error_message.is_some());
    }

    #[test]
    fn missing_lyrics_file_shows_error() {
        let (mut app, _fake) = app_with("A", None);
        type_command(&mut app, "lyrics /definitely/not/here.txt", Instant::now());
        assert!(app.error_message.as_deref().unwrap().contains("here.txt"));
        assert_eq!(app.sheet.len(), 2);
    }

    #[test]
    fn stamping_without_audio_is_refused() {
        let mut app = App::new(Config::default());
        app.replace_sheet(LyricSheet::from_text("A\nB"));
        app.handle_key_at(key(KeyCode::Enter), Instant::now());

        assert!(app.error_message.as_deref().unwrap().contains("no audio loaded"));
        assert_eq!(app.sheet.stamped_count(), 0);
        assert_eq!(app.cursor, 0);
        assert!(!app.is_dirty());
    }

    #[test]
    fn end_of_track_notifies_and_stops_following() {
        let (mut app, _fake) = app_with("[00:01.00] A\n[00:04.00] B\n[00:30.00] C", Some(10.0));
        let t0 = Instant::now();
        app.apply(Action::TogglePlay, t0);
        app.tick(t0 + Duration::from_secs(2));
        assert_eq!(app.cursor, 1);

        app.tick(t0 + Duration::from_secs(12));
        assert_eq!(app.notice.as_deref(), Some("End of track"));
        assert!(!app.player.is_playing());
        assert_eq!(app.cursor, 2);

        // Line C starts after the end and is never reached.
        app.tick(t0 + Duration::from_secs(40));
        assert_eq!(app.cursor, 2);
        assert!((app.position(t0 + Duration::from_secs(40)) - 10.0).abs() < 1e-9);
    }

    fn write_lyrics(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn opening_lyrics_keeps_unsaved_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_lyrics(dir.path(), "a.txt", "One\nTwo\n");
        let b = write_lyrics(dir.path(), "b.txt", "Other\n");

        let mut app = App::new(Config::default());
        app.load_lyrics(&a).unwrap();
        let t0 = Instant::now();
        type_command(&mut app, "t 00:03.00", t0);
        type_command(&mut app, &format!("lyrics {}", b.display()), t0);

        assert!(app.error_message.as_deref().unwrap().contains(":w"));
        assert!(app.is_dirty());
        assert_eq!(app.sheet.stamped_count(), 1);
        assert_eq!(app.sheet.text(1), Some("One"));
        assert_eq!(app.output_path, Some(dir.path().join("a.lrc")));
    }

    #[test]
    fn forced_lyrics_open_discards_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_lyrics(dir.path(), "a.txt", "One\n");
        let b = write_lyrics(dir.path(), "b.txt", "Other\n");

        let mut app = App::new(Config::default());
        app.load_lyrics(&a).unwrap();
        let t0 = Instant::now();
        type_command(&mut app, "t 00:03.00", t0);
        type_command(&mut app, &format!("lyrics! {}", b.display()), t0);

        assert!(app.error_message.is_none());
        assert!(!app.is_dirty());
        assert_eq!(app.sheet.text(1), Some("Other"));
        assert_eq!(app.output_path, Some(dir.path().join("b.lrc")));
    }

    #[test]
    fn opening_lyrics_after_save_needs_no_force() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_lyrics(dir.path(), "a.txt", "One\n");
        let b = write_lyrics(dir.path(), "b.txt", "Other\n");

        let mut app = App::new(Config::default());
        app.load_lyrics(&a).unwrap();
        let t0 = Instant::now();
        type_command(&mut app, "t 00:03.00", t0);
        type_command(&mut app, "w", t0);
        type_command(&mut app, &format!("lyrics {}", b.display()), t0);

        assert!(app.error_message.is_none());
        assert_eq!(app.sheet.text(1), Some("Other"));
    }

    #[test]
    fn explicit_output_survives_lyrics_reload() {
        let dir = tempfile::tempdir().unwrap();
        let lyrics = dir.path().join("song.txt");
        std::fs::write(&lyrics, "Hello\n").unwrap();

        let mut app = App::new(Config::default());
        app.set_output_path(dir.path().join("custom.lrc"));
        app.load_lyrics(&lyrics).unwrap();
        assert_eq!(app.output_path, Some(dir.path().join("custom.lrc")));
    }
}
