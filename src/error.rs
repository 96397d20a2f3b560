//! Application error types.
//!
//! Provides unified error handling with actionable context for the dialogs
//! shown to the user.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred.
        path: std::path::PathBuf,
    },

    /// Audio device, decoding or transport error
    #[error("Audio error: {0}")]
    Audio(String),

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Timestamp parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Lyric line index outside the loaded sheet
    #[error("Line {index} is out of range (sheet has {len} lines)")]
    LineOutOfRange {
        /// Requested line index.
        index: usize,
        /// Number of lines in the sheet.
        len: usize,
    },

    /// System clipboard error
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create an audio error
    pub fn audio(message: impl Into<String>) -> Self {
        Self::Audio(message.into())
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

// Convenience conversions
impl From<rodio::StreamError> for Error {
    fn from(e: rodio::StreamError) -> Self {
        Self::Audio(format!("no audio output device: {e}"))
    }
}

impl From<rodio::PlayError> for Error {
    fn from(e: rodio::PlayError) -> Self {
        Self::Audio(format!("failed to create audio sink: {e}"))
    }
}

impl From<rodio::decoder::DecoderError> for Error {
    fn from(e: rodio::decoder::DecoderError) -> Self {
        Self::Audio(format!("unsupported or corrupt media: {e}"))
    }
}

impl From<arboard::Error> for Error {
    fn from(e: arboard::Error) -> Self {
        Self::Clipboard(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn io_error_keeps_path() {
        let err = Error::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            std::path::PathBuf::from("song.txt"),
        );
        assert!(err.to_string().starts_with("IO error at song.txt: "));
        match err {
            Error::Io { path, .. } => assert_eq!(path, std::path::PathBuf::from("song.txt")),
            _ => panic!("Expected Io error with path"),
        }
    }

    #[test]
    fn parse_error_is_just_the_message() {
        let err: Error = "1:2:3".parse::<crate::lyrics::Timestamp>().unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(err.to_string(), "Parse error: '1:2:3' is not a MM:SS.HH timestamp");
    }

    #[test]
    fn config_error_includes_hint() {
        let err = Error::config("bad seek step", "Use a positive number of seconds");
        assert!(err.to_string().contains("positive number"));
    }
}
