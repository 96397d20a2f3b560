use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::lyrics::Timestamp;
use crate::playback::RepeatState;
use crate::ui::create_titled_block;

/// Position, duration and play state of the loaded track.
pub fn draw_transport(f: &mut Frame, app: &App, area: Rect, position: f64) {
    let block = create_titled_block(" Transport ", false);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let Some(track) = app.player.track_name() else {
        let hint = Paragraph::new(" No audio loaded. Use :audio <path>")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, rows[0]);
        return;
    };

    let (state, state_color) = if app.player.is_playing() {
        ("▶ Playing", Color::Green)
    } else {
        ("⏸ Paused ", Color::Yellow)
    };

    let duration = app.player.duration();
    let time = match duration {
        Some(d) => format!("{} / {}", Timestamp::from_seconds(position), Timestamp::from_seconds(d)),
        None => format!("{} / --:--.--", Timestamp::from_seconds(position)),
    };

    let repeat = match app.player.repeat() {
        RepeatState::Off => String::new(),
        RepeatState::Marked(a) => format!("  A: {}", Timestamp::from_seconds(a)),
        RepeatState::Looping(section) => format!("  Repeat: {}", section.label()),
    };
    let follow = if app.follow { "  Follow" } else { "  Manual" };

    let info = Line::from(vec![
        Span::styled(format!(" {state} "), Style::default().fg(state_color).add_modifier(Modifier::BOLD)),
        Span::styled(time, Style::default().fg(Color::White)),
        Span::styled(format!("  {track}"), Style::default().fg(Color::Cyan)),
        Span::styled(repeat, Style::default().fg(Color::Magenta)),
        Span::styled(follow, Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(info), rows[0]);

    let ratio = duration
        .filter(|d| *d > 0.0)
        .map_or(0.0, |d| (position / d).clamp(0.0, 1.0));
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(ratio)
        .label("")
        .use_unicode(true);
    f.render_widget(gauge, rows[1]);
}
