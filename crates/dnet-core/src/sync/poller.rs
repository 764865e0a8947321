//! Fixed-interval message list poller.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::gate::{Gate, Generation};
use super::observer::{SyncEvent, SyncObserver};
use super::{DisplayState, SyncError};
use crate::backend::MessageBackend;

/// Result of a single poll that reached the backend successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The list was committed. `changed` is false when it matched the
    /// previous list exactly.
    Applied { count: usize, changed: bool },
    /// The session stopped (or restarted) while the request was in flight.
    Discarded,
}

/// Fetches the full list on every tick and commits it wholesale.
///
/// Each tick issues an independent request. A request that outlives the
/// interval overlaps with the next one, and results are committed in the
/// order they complete.
pub struct Poller<B> {
    backend: Arc<B>,
    display: DisplayState,
    gate: Gate,
    observer: Arc<dyn SyncObserver>,
    interval: Duration,
}

impl<B> Clone for Poller<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            display: self.display.clone(),
            gate: self.gate.clone(),
            observer: Arc::clone(&self.observer),
            interval: self.interval,
        }
    }
}

impl<B: MessageBackend> Poller<B> {
    pub fn new(
        backend: Arc<B>,
        display: DisplayState,
        gate: Gate,
        observer: Arc<dyn SyncObserver>,
        interval: Duration,
    ) -> Self {
        Self {
            backend,
            display,
            gate,
            observer,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Issues one fetch and commits the result if `generation` is still open.
    ///
    /// Failures leave the display state untouched; they are logged and
    /// reported to the observer unless the generation has already closed.
    ///
    /// # Errors
    /// Returns the fetch or decode failure.
    pub async fn poll_once(&self, generation: Generation) -> Result<PollOutcome, SyncError> {
        match self.backend.fetch_messages().await {
            Ok(messages) => {
                let count = messages.len();
                // Reported under the gate lock so a concurrent stop() can
                // only emit `Stopped` after this event.
                let Some(changed) = self.gate.apply_if_current(generation, || {
                    let changed = self.display.replace(messages);
                    self.observer.on_event(&SyncEvent::PollApplied { count });
                    changed
                }) else {
                    tracing::debug!(?generation, "discarding poll result after teardown");
                    return Ok(PollOutcome::Discarded);
                };

                tracing::debug!(count, changed, "message list refreshed");
                Ok(PollOutcome::Applied { count, changed })
            }
            Err(err) => {
                if self.gate.is_current(generation) {
                    tracing::warn!("Failed to fetch messages: {err}");
                    self.observer.on_event(&SyncEvent::PollFailed(err.clone()));
                } else {
                    tracing::debug!(?generation, "poll failed after teardown: {err}");
                }
                Err(err)
            }
        }
    }

    /// Runs the timer until `cancel` fires.
    ///
    /// The first poll happens one interval after start. Requests still in
    /// flight when the loop exits are aborted.
    pub async fn run(self, generation: Generation, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let poller = self.clone();
                    in_flight.spawn(async move {
                        // Failures are already logged and reported.
                        let _ = poller.poll_once(generation).await;
                    });
                }
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            }
        }

        in_flight.abort_all();
    }
}
