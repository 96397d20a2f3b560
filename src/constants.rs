//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Playback and seeking constants.
pub mod playback {
    /// Default coarse seek step in seconds.
    pub const DEFAULT_SEEK_STEP: f64 = 5.0;

    /// Default fine seek step in seconds (Shift + seek key).
    pub const DEFAULT_FINE_STEP: f64 = 1.0;

    /// Default interval of the timer-driven position poll, in milliseconds.
    pub const DEFAULT_TICK_MS: u64 = 50;

    /// Smallest accepted poll interval.
    pub const MIN_TICK_MS: u64 = 10;

    /// Largest accepted poll interval.
    pub const MAX_TICK_MS: u64 = 1000;
}

/// Lyrics file constants.
pub mod lyrics {
    /// Extension used when deriving the output path from the lyrics path.
    pub const OUTPUT_EXTENSION: &str = "lrc";

    /// Input lines starting with this marker are section separators and skipped.
    pub const SEPARATOR_PREFIX: &str = "---";

    /// Placeholder shown for lines without a recorded timestamp.
    pub const EMPTY_TAG: &str = "[--:--.--]";
}

/// Logging constants.
pub mod logging {
    /// Directory name under the platform data dir.
    pub const APP_DIR: &str = "lyricsync";

    /// Log file name.
    pub const LOG_FILE: &str = "lyricsync.log";

    /// Filter used when `RUST_LOG` is unset.
    pub const DEFAULT_FILTER: &str = "info";
}

/// UI layout constants.
pub mod ui {
    /// Height of the transport panel, borders included.
    pub const TRANSPORT_HEIGHT: u16 = 4;

    /// Height of the command/status bar, borders included.
    pub const COMMAND_BAR_HEIGHT: u16 = 3;
}
