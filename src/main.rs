//! `lyricsync` - time lyric lines against an audio track.

use anyhow::Context;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{io, panic, time::{Duration, Instant}};

use lyricsync::app::App;
use lyricsync::cli::{build_cli, CliOptions};
use lyricsync::config::Config;
use lyricsync::{logging, ui};

// Helper function to ensure the terminal is cleaned up on exit
fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn build_app(opts: &CliOptions) -> anyhow::Result<App> {
    let config = Config::load()
        .context("Failed to load configuration")?
        .with_steps(opts.seek_step.as_deref(), opts.fine_step.as_deref())
        .context("Invalid command line option")?;

    if let Some(dir) = &config.log_dir {
        // Logging failures are not fatal.
        if let Err(e) = logging::init(dir) {
            eprintln!("Warning: logging disabled: {e}");
        }
    }
    tracing::info!("Starting {} {}", config.app_name(), config.app_version());

    let mut app = App::new(config);
    if let Some(output) = &opts.output {
        app.set_output_path(output.clone());
    }
    if let Some(lyrics) = &opts.lyrics {
        app.load_lyrics(lyrics)
            .with_context(|| format!("Failed to load lyrics from {}", lyrics.display()))?;
    }
    if let Some(audio) = &opts.audio {
        app.open_audio(audio)
            .with_context(|| format!("Failed to open audio {}", audio.display()))?;
    }
    Ok(app)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    let opts = CliOptions::from_matches(&matches);
    let app = build_app(&opts)?;

    // Setup better panic handling that cleans up terminal first
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    if let Err(e) = cleanup_terminal(&mut terminal) {
        eprintln!("Error cleaning up terminal: {e:?}");
    }

    if let Err(err) = res {
        tracing::error!("{err:?}");
        eprintln!("{err:?}");
    }

    tracing::info!("Exiting");
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> anyhow::Result<()> {
    let tick = Duration::from_millis(app.config.tick_ms);

    loop {
        app.tick(Instant::now()); // Timer-driven position poll first

        terminal.draw(|f| ui::draw(f, &mut app))?;

        // The poll timeout is the tick period.
        if event::poll(tick)? {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
