//! Display state: the message list the view renders.

use std::sync::Arc;

use tokio::sync::watch;

/// Ordered list of messages exactly as the backend returned it.
pub type MessageList = Vec<String>;

/// Holder for the last successfully fetched message list.
///
/// Backed by a `watch` channel so the view can react to commits without
/// polling: `subscribe()` yields a receiver that wakes after each change.
/// Replacing the list with identical contents does not wake subscribers.
#[derive(Debug, Clone)]
pub struct DisplayState {
    tx: Arc<watch::Sender<MessageList>>,
}

impl DisplayState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MessageList::new());
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current list.
    pub fn get(&self) -> MessageList {
        self.tx.borrow().clone()
    }

    /// Replaces the whole list. Returns true if the contents changed.
    pub fn replace(&self, messages: MessageList) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == messages {
                false
            } else {
                *current = messages;
                true
            }
        })
    }

    /// Empties the list. Returns true if it was non-empty.
    pub fn clear(&self) -> bool {
        self.replace(MessageList::new())
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Receiver that observes every committed change.
    pub fn subscribe(&self) -> watch::Receiver<MessageList> {
        self.tx.subscribe()
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}
