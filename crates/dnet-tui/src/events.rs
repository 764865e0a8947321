//! UI event types.
//!
//! Every input to the TUI is converted to a `UiEvent` before it reaches the
//! reducer: terminal input, the display-state watch, sync outcomes reported
//! by the session observer, and results of spawned effects.

use crossterm::event::Event as CrosstermEvent;
use dnet_core::sync::{MessageList, SubmitOutcome, SyncError, SyncEvent};

#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (for animation and render pacing).
    Tick,

    /// Emitted once per frame before other events, with the terminal size.
    Frame { width: u16, height: u16 },

    /// Terminal input event (key, mouse, paste, resize).
    Terminal(CrosstermEvent),

    /// The display state committed a different message list.
    MessagesChanged(MessageList),

    /// Poll or send outcome reported by the session.
    Sync(SyncEvent),

    /// A spawned submit finished (successfully or not).
    SubmitFinished(Result<SubmitOutcome, SyncError>),
}
