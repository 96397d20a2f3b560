//! Command line definition.

use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command};

use crate::config::expand_path;

/// Build the CLI argument parser.
pub fn build_cli() -> Command {
    Command::new("lyricsync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Time lyric lines against an audio track and write LRC files")
        .arg(
            Arg::new("AUDIO")
                .value_name("AUDIO")
                .help("Audio file to play")
                .index(1),
        )
        .arg(
            Arg::new("lyrics")
                .long("lyrics")
                .short('l')
                .value_name("PATH")
                .help("Plain text or LRC lyrics file, one line per entry"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .help("Where to save (defaults to the lyrics path with a .lrc extension)"),
        )
        .arg(
            Arg::new("seek-step")
                .long("seek-step")
                .value_name("SECONDS")
                .help("Coarse seek step (overrides LYRICSYNC_SEEK_STEP)"),
        )
        .arg(
            Arg::new("fine-step")
                .long("fine-step")
                .value_name("SECONDS")
                .help("Fine seek step (overrides LYRICSYNC_FINE_STEP)"),
        )
}

/// Parsed command line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Audio file to open at startup.
    pub audio: Option<PathBuf>,
    /// Lyrics file to open at startup.
    pub lyrics: Option<PathBuf>,
    /// Explicit output path.
    pub output: Option<PathBuf>,
    /// Raw `--seek-step` value, validated by the config layer.
    pub seek_step: Option<String>,
    /// Raw `--fine-step` value, validated by the config layer.
    pub fine_step: Option<String>,
}

impl CliOptions {
    /// Extract options from parsed matches, expanding `~` in paths.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let path = |id: &str| matches.get_one::<String>(id).map(|p| expand_path(p));
        let raw = |id: &str| matches.get_one::<String>(id).cloned();

        Self {
            audio: path("AUDIO"),
            lyrics: path("lyrics"),
            output: path("output"),
            seek_step: raw("seek-step"),
            fine_step: raw("fine-step"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        let matches = build_cli().try_get_matches_from(args).unwrap();
        CliOptions::from_matches(&matches)
    }

    #[test]
    fn no_arguments_is_valid() {
        assert_eq!(parse(&["lyricsync"]), CliOptions::default());
    }

    #[test]
    fn parses_all_options() {
        let opts = parse(&[
            "lyricsync",
            "song.mp3",
            "-l",
            "song.txt",
            "--output",
            "out.lrc",
            "--seek-step",
            "10",
            "--fine-step",
            "0.5",
        ]);
        assert_eq!(opts.audio, Some(PathBuf::from("song.mp3")));
        assert_eq!(opts.lyrics, Some(PathBuf::from("song.txt")));
        assert_eq!(opts.output, Some(PathBuf::from("out.lrc")));
        assert_eq!(opts.seek_step.as_deref(), Some("10"));
        assert_eq!(opts.fine_step.as_deref(), Some("0.5"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
