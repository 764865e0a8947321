//! Session lifecycle: owns the state holders and the poll timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::SessionError;
use super::gate::Gate;
use super::observer::{LogOnly, SyncEvent, SyncObserver};
use super::poller::Poller;
use super::transmitter::{SubmitOutcome, Transmitter};
use super::{DisplayState, DraftInput, SyncError};
use crate::backend::MessageBackend;

/// The running poll timer.
struct Running {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// One client session against a message board backend.
///
/// `start()` creates the poll timer, `stop()` destroys it. At most one timer
/// exists at a time: starting a running session is an error. After `stop()`
/// returns, no poll result (including one already in flight) is committed
/// to the display state.
pub struct Session<B> {
    display: DisplayState,
    draft: DraftInput,
    gate: Gate,
    observer: Arc<dyn SyncObserver>,
    poller: Poller<B>,
    transmitter: Transmitter<B>,
    running: Mutex<Option<Running>>,
}

impl<B: MessageBackend> Session<B> {
    /// Creates a stopped session that only logs sync failures.
    pub fn new(backend: B, poll_interval: Duration) -> Self {
        Self::with_observer(backend, poll_interval, Arc::new(LogOnly))
    }

    /// Creates a stopped session reporting every outcome to `observer`.
    pub fn with_observer(
        backend: B,
        poll_interval: Duration,
        observer: Arc<dyn SyncObserver>,
    ) -> Self {
        let backend = Arc::new(backend);
        let display = DisplayState::new();
        let draft = DraftInput::new();
        let gate = Gate::new();

        let poller = Poller::new(
            Arc::clone(&backend),
            display.clone(),
            gate.clone(),
            Arc::clone(&observer),
            poll_interval,
        );
        let transmitter = Transmitter::new(backend, draft.clone(), Arc::clone(&observer));

        Self {
            display,
            draft,
            gate,
            observer,
            poller,
            transmitter,
            running: Mutex::new(None),
        }
    }

    fn running(&self) -> MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts the poll timer on the current tokio runtime.
    ///
    /// # Errors
    /// Returns `SessionError::AlreadyRunning` if the timer already exists,
    /// or `SessionError::NoRuntime` outside a tokio runtime.
    pub fn start(&self) -> Result<(), SessionError> {
        let mut running = self.running();
        if running.is_some() {
            return Err(SessionError::AlreadyRunning);
        }
        let handle = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        let generation = self.gate.open();
        let cancel = CancellationToken::new();
        let task = handle.spawn(self.poller.clone().run(generation, cancel.clone()));
        *running = Some(Running { cancel, task });

        tracing::info!(interval = ?self.poller.interval(), "session started");
        self.observer.on_event(&SyncEvent::Started);
        Ok(())
    }

    /// Stops the poll timer. Idempotent; returns false if already stopped.
    ///
    /// The timer is cancelled first, then the generation is closed so any
    /// response still in flight is dropped instead of committed.
    pub fn stop(&self) -> bool {
        let Some(Running { cancel, task }) = self.running().take() else {
            return false;
        };

        cancel.cancel();
        self.gate.close();
        task.abort();

        tracing::info!("session stopped");
        self.observer.on_event(&SyncEvent::Stopped);
        true
    }

    pub fn is_running(&self) -> bool {
        self.running().is_some()
    }

    /// Submits the current draft. See [`Transmitter::submit`].
    ///
    /// Sending does not require the poll timer to be running.
    ///
    /// # Errors
    /// Returns `SyncError::SendRejected` if the request fails.
    pub async fn submit(&self) -> Result<SubmitOutcome, SyncError> {
        self.transmitter.submit().await
    }

    /// Handle for submitting from a spawned task.
    pub fn transmitter(&self) -> Transmitter<B> {
        self.transmitter.clone()
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn draft(&self) -> &DraftInput {
        &self.draft
    }
}

impl<B> Drop for Session<B> {
    fn drop(&mut self) {
        let running = self
            .running
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(Running { cancel, task }) = running {
            cancel.cancel();
            self.gate.close();
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use tokio::sync::{mpsc, oneshot};

    use super::*;
    use crate::sync::MessageList;
    use crate::sync::observer::ChannelObserver;

    type Reply = Result<MessageList, SyncError>;

    /// Fetches resolve in script order; each fetch can be held open until
    /// the test releases it.
    struct ScriptedBackend {
        fetches: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        sends: mpsc::UnboundedSender<String>,
    }

    impl MessageBackend for ScriptedBackend {
        async fn fetch_messages(&self) -> Result<MessageList, SyncError> {
            let next = self.fetches.lock().unwrap().pop_front();
            match next {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(SyncError::transient("dropped"))),
                None => std::future::pending().await,
            }
        }

        async fn send_message(&self, message: &str) -> Result<(), SyncError> {
            let _ = self.sends.send(message.to_string());
            Ok(())
        }
    }

    struct Harness {
        session: Session<ScriptedBackend>,
        replies: VecDeque<oneshot::Sender<Reply>>,
        events: mpsc::UnboundedReceiver<SyncEvent>,
        sends: mpsc::UnboundedReceiver<String>,
    }

    fn harness(fetches: usize) -> Harness {
        let mut replies = VecDeque::new();
        let mut pending = VecDeque::new();
        for _ in 0..fetches {
            let (tx, rx) = oneshot::channel();
            replies.push_back(tx);
            pending.push_back(rx);
        }
        let (send_tx, sends) = mpsc::unbounded_channel();
        let (observer, events) = ChannelObserver::new();
        let backend = ScriptedBackend {
            fetches: Mutex::new(pending),
            sends: send_tx,
        };
        Harness {
            session: Session::with_observer(backend, Duration::from_millis(2000), Arc::new(observer)),
            replies,
            events,
            sends,
        }
    }

    fn list(items: &[&str]) -> MessageList {
        items.iter().map(ToString::to_string).collect()
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_empty_before_first_poll() {
        let mut h = harness(1);
        h.session.start().unwrap();
        h.replies.pop_front().unwrap().send(Ok(list(&["a"]))).unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(h.session.display().is_empty());

        tokio::time::sleep(Duration::from_millis(600)).await;
        settle().await;
        assert_eq!(h.session.display().get(), list(&["a"]));
        assert_eq!(h.events.recv().await.unwrap(), SyncEvent::Started);
        assert_eq!(
            h.events.recv().await.unwrap(),
            SyncEvent::PollApplied { count: 1 }
        );
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let h = harness(0);
        h.session.start().unwrap();
        assert_eq!(h.session.start(), Err(SessionError::AlreadyRunning));
        assert!(h.session.is_running());
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let h = harness(0);
        assert_eq!(h.session.start(), Err(SessionError::NoRuntime));
        assert!(!h.session.is_running());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_and_restartable() {
        let mut h = harness(0);
        assert!(!h.session.stop());

        h.session.start().unwrap();
        assert!(h.session.stop());
        assert!(!h.session.stop());
        assert!(!h.session.is_running());

        h.session.start().unwrap();
        assert!(h.session.is_running());

        assert_eq!(h.events.recv().await.unwrap(), SyncEvent::Started);
        assert_eq!(h.events.recv().await.unwrap(), SyncEvent::Stopped);
        assert_eq!(h.events.recv().await.unwrap(), SyncEvent::Started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_after_stop_is_ignored() {
        let mut h = harness(1);
        h.session.display().replace(list(&["before"]));
        h.session.start().unwrap();

        // Let the first tick fire so the request is in flight.
        tokio::time::sleep(Duration::from_millis(2001)).await;
        settle().await;

        assert!(h.session.stop());
        let _ = h.replies.pop_front().unwrap().send(Ok(list(&["after teardown"])));
        settle().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(h.session.display().get(), list(&["before"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_for_old_generation_ignored_after_restart() {
        let mut h = harness(1);
        h.session.start().unwrap();
        tokio::time::sleep(Duration::from_millis(2001)).await;
        settle().await;

        h.session.stop();
        h.session.start().unwrap();
        let _ = h.replies.pop_front().unwrap().send(Ok(list(&["stale"])));
        settle().await;

        assert!(h.session.display().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_poll_overlaps_next_tick() {
        let mut h = harness(2);
        h.session.start().unwrap();

        // Tick 1 issues fetch #1, which stays pending past tick 2.
        tokio::time::sleep(Duration::from_millis(2001)).await;
        settle().await;
        tokio::time::sleep(Duration::from_millis(2000)).await;
        settle().await;

        let first = h.replies.pop_front().unwrap();
        let second = h.replies.pop_front().unwrap();

        second.send(Ok(list(&["x", "y"]))).unwrap();
        settle().await;
        assert_eq!(h.session.display().get(), list(&["x", "y"]));

        first.send(Ok(list(&["x"]))).unwrap();
        settle().await;
        assert_eq!(h.session.display().get(), list(&["x"]));
    }

    #[tokio::test]
    async fn test_submit_does_not_echo_locally() {
        let mut h = harness(0);
        h.session.draft().replace("help");

        assert_eq!(h.session.submit().await.unwrap(), SubmitOutcome::Sent);
        assert_eq!(h.sends.recv().await.unwrap(), "help");
        assert_eq!(h.session.draft().get(), "");
        assert!(h.session.display().is_empty());
    }

    #[tokio::test]
    async fn test_drop_stops_timer() {
        let h = harness(0);
        h.session.start().unwrap();
        let gate = h.session.gate.clone();
        drop(h);
        assert_eq!(gate.current(), None);
    }
}
