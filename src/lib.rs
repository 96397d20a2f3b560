//! `lyricsync` - time lyric lines against an audio track.
//!
//! Loads a plain-text lyrics file, plays the audio, and records the playback
//! position against each line as the user presses a key. The result is saved
//! as an LRC-style `[MM:SS.HH] text` file.

// Re-export public modules for use in integration tests and as a library
pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod logging;
pub mod lyrics;
pub mod playback;
pub mod ui;
