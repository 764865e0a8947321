//! Application state for the TUI.
//!
//! ```text
//! AppState
//! ├── messages: MessageList  (last list committed to the display state)
//! ├── draft: DraftInput      (shared with the session's transmitter)
//! ├── scroll: ScrollState    (message pane position)
//! └── status: StatusState    (backend address, send/poll status)
//! ```

use dnet_core::sync::{DraftInput, MessageList};

use crate::scroll::ScrollState;

/// Connection status as seen from poll outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// No poll has completed yet.
    Waiting,
    /// The last poll succeeded.
    Online,
    /// The last poll failed.
    Offline,
}

/// Status line contents.
#[derive(Debug, Clone)]
pub struct StatusState {
    /// Backend address shown to the user.
    pub backend: String,
    pub link: Link,
    /// A submit is in flight.
    pub sending: bool,
    /// Most recent poll or send failure, cleared by the next success of the
    /// same kind.
    pub last_error: Option<String>,
}

impl StatusState {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            link: Link::Waiting,
            sending: false,
            last_error: None,
        }
    }
}

pub struct AppState {
    pub messages: MessageList,
    pub draft: DraftInput,
    pub scroll: ScrollState,
    pub status: StatusState,
    /// Terminal size from the last `Frame` event.
    pub width: u16,
    pub height: u16,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(draft: DraftInput, backend: impl Into<String>) -> Self {
        Self {
            messages: MessageList::new(),
            draft,
            scroll: ScrollState::default(),
            status: StatusState::new(backend),
            width: 0,
            height: 0,
            spinner_frame: 0,
            should_quit: false,
        }
    }
}
