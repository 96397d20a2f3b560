//! Input handling abstractions.
//!
//! Maps key events and `:` command lines to actions so the mapping can be
//! tested without a terminal or an audio device.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::lyrics::Timestamp;

/// Seek step size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The configured coarse step.
    Coarse,
    /// The configured fine step.
    Fine,
}

/// Something the user asked for from the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Play or pause.
    TogglePlay,
    /// Record the playback position on the cursor line and move down.
    Stamp,
    /// Move the cursor up one line.
    LineUp,
    /// Move the cursor down one line.
    LineDown,
    /// Move the cursor to the first line.
    FirstLine,
    /// Move the cursor to the last line.
    LastLine,
    /// Seek backwards.
    SeekBack(Step),
    /// Seek forwards.
    SeekForward(Step),
    /// Seek to the cursor line's timestamp.
    JumpToLine,
    /// Remove the cursor line's timestamp.
    ClearLine,
    /// Restore the cursor line's loaded timestamp.
    RestoreLine,
    /// Loop from the cursor line to the next timestamp.
    RepeatLine,
    /// Advance the A/B repeat cycle.
    RepeatAb,
    /// Toggle whether the cursor follows playback.
    ToggleFollow,
    /// Save to the output path.
    Save,
    /// Open the command line.
    EnterCommand,
    /// Show the help modal.
    Help,
    /// Ask to quit.
    Quit,
}

/// Map a key in the main view to an action.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let action = match key.code {
        KeyCode::Char('s') if ctrl => Action::Save,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char(' ') => Action::TogglePlay,
        KeyCode::Enter => Action::Stamp,
        KeyCode::Up | KeyCode::Char('w' | 'k') => Action::LineUp,
        KeyCode::Down | KeyCode::Char('s' | 'j') => Action::LineDown,
        KeyCode::Home => Action::FirstLine,
        KeyCode::End => Action::LastLine,
        KeyCode::Left if shift => Action::SeekBack(Step::Fine),
        KeyCode::Right if shift => Action::SeekForward(Step::Fine),
        KeyCode::Left | KeyCode::Char('a') => Action::SeekBack(Step::Coarse),
        KeyCode::Right | KeyCode::Char('d') => Action::SeekForward(Step::Coarse),
        KeyCode::Char('A') => Action::SeekBack(Step::Fine),
        KeyCode::Char('D') => Action::SeekForward(Step::Fine),
        KeyCode::Char('g') | KeyCode::Tab => Action::JumpToLine,
        KeyCode::Backspace | KeyCode::Delete => Action::ClearLine,
        KeyCode::Char('\\') => Action::RestoreLine,
        KeyCode::Char('r') => Action::RepeatLine,
        KeyCode::Char('b') => Action::RepeatAb,
        KeyCode::Char('f') => Action::ToggleFollow,
        KeyCode::Char(':') => Action::EnterCommand,
        KeyCode::Char('?') | KeyCode::F(1) => Action::Help,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Save, optionally to a new path.
    Write(Option<String>),
    /// Save and quit.
    WriteQuit,
    /// Quit, asking first if there are unsaved changes.
    Quit,
    /// Quit without saving.
    ForceQuit,
    /// Load another audio file.
    OpenAudio(String),
    /// Load another lyrics file.
    OpenLyrics {
        /// File to load.
        path: String,
        /// Drop unsaved timestamps (`:lyrics!`).
        discard: bool,
    },
    /// Set the cursor line's timestamp.
    SetTime(Timestamp),
    /// Clear the cursor line's timestamp.
    Clear,
    /// Clear every timestamp.
    Reset,
    /// Copy the output text to the clipboard.
    Copy,
    /// Toggle follow mode.
    Follow,
    /// Show help.
    Help,
}

/// Parse the text typed after `:`.
pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.trim();
    let (name, arg) = match input.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (input, None),
    };

    let need = |what: &str| arg.map(str::to_string).ok_or_else(|| format!(":{name} needs {what}"));

    match name {
        "w" | "write" | "save" => Ok(Command::Write(arg.map(str::to_string))),
        "wq" | "x" => Ok(Command::WriteQuit),
        "q" | "quit" => Ok(Command::Quit),
        "q!" | "quit!" => Ok(Command::ForceQuit),
        "audio" | "a" => need("an audio file path").map(Command::OpenAudio),
        "lyrics" | "l" => need("a lyrics file path").map(|path| Command::OpenLyrics { path, discard: false }),
        "lyrics!" | "l!" => need("a lyrics file path").map(|path| Command::OpenLyrics { path, discard: true }),
        "t" | "time" => {
            let value = need("a time like 01:23.45")?;
            value.parse::<Timestamp>().map(Command::SetTime).map_err(|e| e.to_string())
        }
        "clear" => Ok(Command::Clear),
        "reset" => Ok(Command::Reset),
        "copy" | "y" => Ok(Command::Copy),
        "follow" | "f" => Ok(Command::Follow),
        "h" | "help" => Ok(Command::Help),
        "" => Err("Empty command".to_string()),
        other => Err(format!("Unknown command :{other}")),
    }
}
