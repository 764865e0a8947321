//! Pure view functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::scroll::wrap_message;
use crate::state::{AppState, Link};

pub const TITLE: &str = "DisasterNet";
pub const SUBTITLE: &str = "Emergency Communication • No Internet Required";
pub const EMPTY_PLACEHOLDER: &str = "No messages yet";
pub const INPUT_PLACEHOLDER: &str = "Type your message...";

/// Title, subtitle, and the bottom border.
const HEADER_HEIGHT: u16 = 3;
/// One row of input between borders.
const INPUT_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 1;
/// Horizontal padding on each side of the message pane.
const MESSAGES_MARGIN: u16 = 1;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Size of the message pane (columns, rows) for a terminal of the given size.
///
/// The reducer uses this to keep scroll math in step with what is drawn.
pub fn message_pane_size(width: u16, height: u16) -> (usize, usize) {
    let columns = width.saturating_sub(MESSAGES_MARGIN * 2);
    let rows = height.saturating_sub(HEADER_HEIGHT + INPUT_HEIGHT + STATUS_HEIGHT);
    (usize::from(columns), usize::from(rows))
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let [header, messages, input, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(frame.area());

    render_header(frame, header);
    render_messages(app, frame, messages);
    render_input(app, frame, input);
    render_status(app, frame, status);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::Gray))),
    ];
    let header = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_messages(app: &AppState, frame: &mut Frame, area: Rect) {
    let area = area.inner(Margin {
        horizontal: MESSAGES_MARGIN,
        vertical: 0,
    });
    if area.height == 0 || area.width == 0 {
        return;
    }

    if app.messages.is_empty() {
        let middle = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        let empty = Paragraph::new(EMPTY_PLACEHOLDER)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, middle);
        return;
    }

    let width = usize::from(area.width);
    let height = usize::from(area.height);
    let lines: Vec<Line> = app
        .messages
        .iter()
        .enumerate()
        .flat_map(|(idx, message)| {
            // Alternate shades so adjacent messages stay distinguishable.
            let style = if idx % 2 == 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            wrap_message(message, width)
                .into_iter()
                .map(move |row| Line::from(Span::styled(row, style)))
        })
        .skip(app.scroll.offset())
        .take(height)
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_input(app: &AppState, frame: &mut Frame, area: Rect) {
    let title = if app.status.sending {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        format!(" {spinner} Sending ")
    } else {
        " Message · Enter to send ".to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    let text = app.draft.get();
    let (content, cursor_col) = if text.is_empty() {
        (
            Line::from(Span::styled(
                INPUT_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            )),
            0,
        )
    } else {
        let (visible, used) = tail_fitting(&text, usize::from(inner.width.saturating_sub(1)));
        (Line::from(visible), used)
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
    if inner.width > 0 && inner.height > 0 {
        let col = u16::try_from(cursor_col).unwrap_or(inner.width);
        frame.set_cursor_position((inner.x + col.min(inner.width - 1), inner.y));
    }
}

/// The longest suffix of `text` that fits in `width` columns, and its width.
fn tail_fitting(text: &str, width: usize) -> (String, usize) {
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    (text[start..].to_string(), used)
}

fn render_status(app: &AppState, frame: &mut Frame, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let (marker, label, color) = match app.status.link {
        Link::Waiting => ("○", "connecting", Color::Yellow),
        Link::Online => ("●", "online", Color::Green),
        Link::Offline => ("●", "offline", Color::Red),
    };

    // The error goes right after the marker; anything past the width is clipped.
    let mut spans = vec![Span::styled(
        format!(" {marker} {label}"),
        Style::default().fg(color),
    )];
    if let Some(error) = &app.status.last_error {
        spans.push(Span::styled(
            format!(" · {error}"),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(format!(" · {}", app.status.backend), dim));
    spans.push(Span::styled(
        format!(" · {} messages", app.messages.len()),
        dim,
    ));
    if !app.scroll.is_following() {
        spans.push(Span::styled(" · End to follow", dim));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
