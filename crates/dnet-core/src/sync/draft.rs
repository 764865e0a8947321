//! The user's in-progress message.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to the draft text.
///
/// The view edits it keystroke by keystroke; the transmitter reads it on
/// submit and clears it after a successful send. Nothing else empties it.
#[derive(Debug, Clone, Default)]
pub struct DraftInput {
    text: Arc<Mutex<String>>,
}

impl DraftInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Arc::new(Mutex::new(text.into())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> String {
        self.lock().clone()
    }

    pub fn replace(&self, text: impl Into<String>) {
        *self.lock() = text.into();
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn push(&self, c: char) {
        self.lock().push(c);
    }

    pub fn push_str(&self, s: &str) {
        self.lock().push_str(s);
    }

    pub fn pop(&self) -> Option<char> {
        self.lock().pop()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// True when the draft holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.lock().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_operations() {
        let draft = DraftInput::new();
        draft.push_str("hel");
        draft.push('p');
        assert_eq!(draft.get(), "help");

        assert_eq!(draft.pop(), Some('p'));
        assert_eq!(draft.get(), "hel");

        draft.replace("water");
        assert_eq!(draft.get(), "water");

        draft.clear();
        assert!(draft.is_empty());
        assert_eq!(draft.pop(), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(DraftInput::new().is_blank());
        assert!(DraftInput::with_text("   \t").is_blank());
        assert!(!DraftInput::with_text("  sos ").is_blank());
    }

    #[test]
    fn test_clones_share_text() {
        let draft = DraftInput::with_text("a");
        let handle = draft.clone();
        handle.push('b');
        assert_eq!(draft.get(), "ab");
    }
}
