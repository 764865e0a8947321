//! Structured channel for sync outcomes.
//!
//! The core always logs failures through `tracing` and carries on. Hosts that
//! want to surface outcomes (status line, exit codes) install an observer on
//! the session and receive every `SyncEvent` as it happens.

use tokio::sync::mpsc;

use super::SyncError;

/// Outcome of one poll or send attempt, or a lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Started,
    Stopped,
    /// A fetched list was committed to the display state.
    PollApplied { count: usize },
    PollFailed(SyncError),
    Sent,
    SendFailed(SyncError),
}

impl SyncEvent {
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncEvent::PollFailed(err) | SyncEvent::SendFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Receives sync events. Called from whichever task produced the event, so
/// implementations must not block.
///
/// `PollApplied` is delivered while the session's commit lock is held;
/// calling `Session::start` or `Session::stop` from `on_event` deadlocks.
pub trait SyncObserver: Send + Sync {
    fn on_event(&self, event: &SyncEvent);
}

/// Default observer: events are only logged by the core itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnly;

impl SyncObserver for LogOnly {
    fn on_event(&self, _event: &SyncEvent) {}
}

/// Forwards events into an unbounded channel.
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<SyncEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SyncObserver for ChannelObserver {
    fn on_event(&self, event: &SyncEvent) {
        let _ = self.tx.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_forwards_events() {
        let (observer, mut rx) = ChannelObserver::new();
        observer.on_event(&SyncEvent::PollApplied { count: 2 });
        observer.on_event(&SyncEvent::SendFailed(SyncError::rejected("503")));

        assert_eq!(rx.try_recv().unwrap(), SyncEvent::PollApplied { count: 2 });
        let failed = rx.try_recv().unwrap();
        assert_eq!(failed.error(), Some(&SyncError::rejected("503")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_observer_survives_dropped_receiver() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_event(&SyncEvent::Sent);
    }
}
