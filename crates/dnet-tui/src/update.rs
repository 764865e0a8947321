//! TUI reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use dnet_core::sync::SyncEvent;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::render;
use crate::state::{AppState, Link};

/// Rows moved per mouse wheel step.
const WHEEL_LINES: usize = 3;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            if app.status.sending {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        UiEvent::Frame { width, height } => {
            if (width, height) != (app.width, app.height) {
                app.width = width;
                app.height = height;
                relayout(app);
            }
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::MessagesChanged(messages) => {
            app.messages = messages;
            relayout(app);
            app.scroll.scroll_to_bottom();
            vec![]
        }
        UiEvent::Sync(event) => {
            handle_sync_event(app, event);
            vec![]
        }
        UiEvent::SubmitFinished(_) => {
            // Success and failure are reported through `Sync` events.
            app.status.sending = false;
            vec![]
        }
    }
}

/// Recomputes wrapped row counts after the messages or the terminal size
/// changed.
fn relayout(app: &mut AppState) {
    let (columns, rows) = render::message_pane_size(app.width, app.height);
    app.scroll.viewport_height = rows;
    app.scroll.line_count = crate::scroll::wrapped_height(&app.messages, columns);
}

fn handle_sync_event(app: &mut AppState, event: SyncEvent) {
    match event {
        SyncEvent::PollApplied { .. } => {
            if app.status.link == Link::Offline {
                app.status.last_error = None;
            }
            app.status.link = Link::Online;
        }
        SyncEvent::PollFailed(err) => {
            app.status.link = Link::Offline;
            app.status.last_error = Some(err.to_string());
        }
        SyncEvent::Sent => {
            app.status.last_error = None;
        }
        SyncEvent::SendFailed(err) => {
            app.status.last_error = Some(err.to_string());
        }
        SyncEvent::Started | SyncEvent::Stopped => {}
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollUp => app.scroll.scroll_up(WHEEL_LINES),
                MouseEventKind::ScrollDown => app.scroll.scroll_down(WHEEL_LINES),
                _ => {}
            }
            vec![]
        }
        Event::Paste(text) => {
            // The input is a single line.
            app.draft.push_str(&text.replace(['\r', '\n'], " "));
            vec![]
        }
        Event::Resize(width, height) => {
            app.width = width;
            app.height = height;
            relayout(app);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Char('c' | 'd') if ctrl => vec![UiEffect::Quit],
        KeyCode::Enter => submit(app),
        KeyCode::Backspace => {
            app.draft.pop();
            vec![]
        }
        KeyCode::Char(c) if !ctrl => {
            app.draft.push(c);
            vec![]
        }
        KeyCode::PageUp => {
            app.scroll.page_up();
            vec![]
        }
        KeyCode::PageDown => {
            app.scroll.page_down();
            vec![]
        }
        KeyCode::Up => {
            app.scroll.scroll_up(1);
            vec![]
        }
        KeyCode::Down => {
            app.scroll.scroll_down(1);
            vec![]
        }
        KeyCode::Home => {
            app.scroll.scroll_to_top();
            vec![]
        }
        KeyCode::End => {
            app.scroll.scroll_to_bottom();
            vec![]
        }
        _ => vec![],
    }
}

/// Submit path shared by the Enter key and anything else that sends.
///
/// Blank drafts are ignored here so no request is spawned for them; the
/// transmitter applies the same rule.
pub fn submit(app: &mut AppState) -> Vec<UiEffect> {
    if app.status.sending || app.draft.is_blank() {
        return vec![];
    }
    app.status.sending = true;
    vec![UiEffect::Submit]
}
