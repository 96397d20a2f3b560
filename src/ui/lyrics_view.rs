use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::app::App;
use crate::constants::lyrics::EMPTY_TAG;
use crate::lyrics::Timestamp;
use crate::ui::create_titled_block;

/// Draw the lyric lines with their timestamps.
///
/// `playing` is the line whose timestamp was most recently passed, and
/// `repeat` the inclusive range of lines inside the active repeat section.
pub fn draw_lyrics(
    f: &mut Frame,
    app: &mut App,
    area: Rect,
    playing: Option<usize>,
    repeat: Option<(Timestamp, Timestamp)>,
) {
    let selection_bg = Color::Rgb(80, 80, 120);
    let repeat_bg = Color::Rgb(40, 60, 40);

    let items: Vec<ListItem> = (0..app.sheet.len())
        .map(|i| {
            let is_selected = i == app.cursor;
            let is_playing = Some(i) == playing;
            let stamp = app.sheet.timestamp(i);
            let in_repeat = match (stamp, repeat) {
                (Some(ts), Some((start, end))) => ts >= start && ts < end,
                _ => false,
            };

            let bg = if is_selected {
                selection_bg
            } else if in_repeat {
                repeat_bg
            } else {
                Color::Reset
            };

            let (tag, tag_style) = match stamp {
                Some(ts) if app.sheet.is_modified(i) => (ts.tag(), Style::default().fg(Color::Yellow)),
                Some(ts) => (ts.tag(), Style::default().fg(Color::Green)),
                None => (EMPTY_TAG.to_string(), Style::default().fg(Color::DarkGray)),
            };

            let text_style = if is_playing {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let prefix = if is_selected { "> " } else { "  " };
            let marker = if app.sheet.is_modified(i) { "* " } else { "  " };
            let text = match app.sheet.text(i) {
                Some("") if i == 0 => "(intro)".to_string(),
                Some(t) => t.to_string(),
                None => String::new(),
            };

            let spans = vec![
                Span::raw(prefix),
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(tag, tag_style),
                Span::raw(" "),
                Span::styled(text, text_style),
            ];

            ListItem::new(Line::from(spans)).style(Style::default().bg(bg))
        })
        .collect();

    let name = app
        .sheet
        .source()
        .and_then(|p| p.file_name())
        .map_or_else(|| "untitled".to_string(), |n| n.to_string_lossy().into_owned());
    let dirty = if app.is_dirty() { " [+]" } else { "" };
    let title = format!(
        " {name}{dirty}  {}/{} stamped ",
        app.sheet.stamped_count(),
        app.sheet.len()
    );

    let list = List::new(items).block(create_titled_block(&title, !app.follow));
    f.render_stateful_widget(list, area, &mut app.list_state);
}
