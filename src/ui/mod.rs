//! User interface components.
//!
//! Provides TUI widgets and drawing functions for the application's
//! terminal-based user interface using ratatui.

mod lyrics_view;
mod transport_bar;

pub use lyrics_view::draw_lyrics;
pub use transport_bar::draw_transport;

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppMode};
use crate::constants::ui::{COMMAND_BAR_HEIGHT, TRANSPORT_HEIGHT};
use crate::lyrics::Timestamp;

/// Render the full application UI to the terminal frame.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TRANSPORT_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(COMMAND_BAR_HEIGHT), // Command/status bar at bottom
        ])
        .split(f.size());

    let position = app.position(Instant::now());
    let playing = app.sheet.line_at(Timestamp::from_seconds(position));
    let repeat = app
        .player
        .repeat()
        .section()
        .map(|s| (Timestamp::from_seconds(s.start()), Timestamp::from_seconds(s.end())));

    draw_transport(f, app, chunks[0], position);
    draw_lyrics(f, app, chunks[1], playing, repeat);
    draw_command_bar(f, app, chunks[2]);

    // Blocking modals, in the order handle_key consumes them
    if let Some(error) = &app.error_message {
        draw_error_message(f, error);
        return;
    }
    if app.pending_quit_confirmation {
        if let Some(status) = &app.status_message {
            draw_status_message(f, status, "y: quit | n/Esc: keep working");
        }
        return;
    }
    if let Some(status) = &app.status_message {
        draw_status_message(f, status, "Press Esc to dismiss");
        return;
    }

    if app.show_help {
        draw_help_modal(f);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn draw_command_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.mode == AppMode::Command { "Command" } else { "Commands/Status" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(title, Style::default().fg(Color::Yellow)));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if app.mode == AppMode::Command {
        let command = Paragraph::new(format!(" :{}", app.command_buffer))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(command, inner_area);
        f.set_cursor(
            inner_area.left() + app.command_buffer.width() as u16 + 2,
            inner_area.top(),
        );
    } else if let Some(notice) = &app.notice {
        let text = Paragraph::new(format!(" {notice}")).style(Style::default().fg(Color::Cyan));
        f.render_widget(text, inner_area);
    } else {
        let help_text = create_help_text(&[
            ("Space", "Play/Pause"),
            ("Enter", "Stamp"),
            ("←/→", "Seek"),
            ("g", "Jump"),
            ("r", "Repeat"),
            ("Ctrl+S", "Save"),
            ("?", "Help"),
        ]);
        let status_bar = Paragraph::new(Line::from(help_text)).style(Style::default().fg(Color::Gray));
        f.render_widget(status_bar, inner_area);
    }
}

/// Build styled help text spans from key-description pairs for the command bar.
pub fn create_help_text<'a>(commands: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut text = vec![Span::raw(" ")]; // Start with padding

    for (i, (key, description)) in commands.iter().enumerate() {
        text.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        text.push(Span::raw(format!(": {description}")));

        if i + 1 < commands.len() {
            text.push(Span::raw(" | "));
        }
    }

    text
}

/// Create a bordered block with a title, highlighted when focused.
pub fn create_titled_block(title: &str, is_focused: bool) -> Block<'_> {
    let title_style = if is_focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let border_style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn centered(size: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: (size.width.saturating_sub(width)) / 2,
        y: (size.height.saturating_sub(height)) / 2,
        width: width.min(size.width),
        height: height.min(size.height),
    }
}

// Draw an error message overlay
fn draw_error_message(f: &mut Frame, message: &str) {
    let size = f.size();
    let width = 50.min(size.width.saturating_sub(4));
    let area = centered(size, width, 7);

    let block = Block::default()
        .title(Span::styled("Error", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area); // Clear the area first
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Space for a "Press Esc to dismiss" hint
        ])
        .margin(1)
        .split(area);

    f.render_widget(text, inner_area[0]);

    let hint = Paragraph::new("Press Esc to dismiss")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(hint, inner_area[1]);
}

#[allow(clippy::cast_possible_truncation)]
fn draw_status_message(f: &mut Frame, message: &str, hint: &str) {
    let size = f.size();

    // Calculate box width (max 80% of screen, min 50)
    let max_width = (size.width as usize * 80) / 100;
    let width = message.width().saturating_add(6).min(max_width).max(50) as u16;

    let inner_width = width.saturating_sub(4) as usize; // account for borders + margin
    let msg_lines = message.width().div_ceil(inner_width.max(1));
    let height = (msg_lines as u16 + 4).min(size.height.saturating_sub(4));
    let area = centered(size, width, height);

    let block = Block::default()
        .title(Span::styled("Info", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // message (flexible)
            Constraint::Length(1), // hint
        ])
        .margin(1)
        .split(area);

    f.render_widget(text, inner_area[0]);

    let hint = Paragraph::new(hint.to_string())
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(hint, inner_area[1]);
}

// Draw the help modal with keybindings
fn draw_help_modal(f: &mut Frame) {
    let size = f.size();
    let width = 64.min(size.width.saturating_sub(4));
    let height = 40.min(size.height.saturating_sub(2));
    let area = centered(size, width, height);

    let block = Block::default()
        .title(Span::styled(" Help - Keybindings ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, area);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let help_text: Vec<Line> = help_content()
        .iter()
        .map(|(key, desc, is_header)| {
            if *is_header {
                Line::from(vec![
                    Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ])
            } else {
                Line::from(vec![
                    Span::styled(format!("{key:>16}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(*desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    f.render_widget(Paragraph::new(help_text).wrap(Wrap { trim: false }), inner_area);
}

fn help_content() -> Vec<(&'static str, &'static str, bool)> {
    vec![
        ("── Playback ──", "", true),
        ("Space", "Play / pause", false),
        ("←/→ or a/d", "Seek by the coarse step", false),
        ("Shift+←/→, A/D", "Seek by the fine step", false),
        ("g / Tab", "Jump to the line's timestamp", false),
        ("r", "Repeat the current line", false),
        ("b", "Mark A, mark B, clear", false),
        ("", "", false),
        ("── Timing ──", "", true),
        ("Enter", "Stamp line and move down", false),
        ("↑/↓, w/s, j/k", "Move between lines", false),
        ("Home/End", "First / last line", false),
        ("Backspace/Del", "Clear the line's timestamp", false),
        ("\\", "Restore the loaded timestamp", false),
        ("f", "Toggle follow playback", false),
        ("Ctrl+S", "Save", false),
        ("", "", false),
        ("── Commands ──", "", true),
        (":w [path]", "Save, optionally elsewhere", false),
        (":wq / :x", "Save and quit", false),
        (":q / :q!", "Quit / quit without saving", false),
        (":audio <path>", "Open an audio file", false),
        (":lyrics <path>", "Open a lyrics file", false),
        (":lyrics! <path>", "Open lyrics, dropping unsaved times", false),
        (":t MM:SS.HH", "Set the line's timestamp", false),
        (":clear / :reset", "Clear line / all timestamps", false),
        (":copy", "Copy output to clipboard", false),
        ("", "", false),
        ("Press Esc, F1 or ? to close", "", true),
    ]
}
