//! Generation gate guarding display-state writes against teardown.
//!
//! Each `Session::start` opens a new generation; each poll captures the
//! generation it was issued under. A result is committed only while holding
//! the gate lock and only if that generation is still open, so once
//! `close()` returns no late response can slip through.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(pub u64);

#[derive(Debug, Default)]
struct GateState {
    current: u64,
    open: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Gate {
    state: Arc<Mutex<GateState>>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a fresh generation. Anything issued under an earlier one is
    /// discarded from now on.
    pub fn open(&self) -> Generation {
        let mut state = self.lock();
        state.current = state.current.wrapping_add(1);
        state.open = true;
        Generation(state.current)
    }

    /// Closes the current generation. Returns false if it was already closed.
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        let was_open = state.open;
        state.current = state.current.wrapping_add(1);
        state.open = false;
        was_open
    }

    /// The open generation, if any.
    pub fn current(&self) -> Option<Generation> {
        let state = self.lock();
        state.open.then_some(Generation(state.current))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == Some(generation)
    }

    /// Runs `f` under the gate lock if `generation` is still open.
    pub fn apply_if_current<R>(&self, generation: Generation, f: impl FnOnce() -> R) -> Option<R> {
        let state = self.lock();
        if state.open && state.current == generation.0 {
            Some(f())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_by_default() {
        let gate = Gate::new();
        assert_eq!(gate.current(), None);
        assert!(!gate.close());
    }

    #[test]
    fn test_apply_only_for_open_generation() {
        let gate = Gate::new();
        let first = gate.open();
        assert_eq!(gate.apply_if_current(first, || 1), Some(1));

        assert!(gate.close());
        assert_eq!(gate.apply_if_current(first, || 2), None);

        let second = gate.open();
        assert_ne!(first, second);
        assert_eq!(gate.apply_if_current(first, || 3), None);
        assert_eq!(gate.apply_if_current(second, || 4), Some(4));
    }

    #[test]
    fn test_close_is_idempotent() {
        let gate = Gate::new();
        gate.open();
        assert!(gate.close());
        assert!(!gate.close());
        assert_eq!(gate.current(), None);
    }
}
