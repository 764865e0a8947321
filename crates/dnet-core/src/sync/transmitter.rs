//! Send path: posts the draft and clears it on success.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::observer::{SyncEvent, SyncObserver};
use super::{DraftInput, SyncError};
use crate::backend::MessageBackend;

/// What a submit did when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft was empty or whitespace; no request was issued.
    Skipped,
    /// Another send is still in flight; no request was issued.
    Busy,
    /// The backend accepted the message and the draft was cleared.
    Sent,
}

/// Clears the in-flight flag when the send finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends the composed message to the backend.
///
/// The sent message is not echoed into the display state; it shows up once
/// a later poll returns it from the backend.
pub struct Transmitter<B> {
    backend: Arc<B>,
    draft: DraftInput,
    observer: Arc<dyn SyncObserver>,
    in_flight: Arc<AtomicBool>,
}

impl<B> Clone for Transmitter<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            draft: self.draft.clone(),
            observer: Arc::clone(&self.observer),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<B: MessageBackend> Transmitter<B> {
    pub fn new(backend: Arc<B>, draft: DraftInput, observer: Arc<dyn SyncObserver>) -> Self {
        Self {
            backend,
            draft,
            observer,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submits the current draft.
    ///
    /// A blank draft is a no-op. Otherwise the draft is sent untrimmed; on
    /// success the draft is cleared, on failure it is left as typed.
    ///
    /// # Errors
    /// Returns `SyncError::SendRejected` if the request fails.
    pub async fn submit(&self) -> Result<SubmitOutcome, SyncError> {
        let text = self.draft.get();
        if text.trim().is_empty() {
            return Ok(SubmitOutcome::Skipped);
        }

        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("send already in flight, ignoring submit");
            return Ok(SubmitOutcome::Busy);
        };

        match self.backend.send_message(&text).await {
            Ok(()) => {
                self.draft.clear();
                tracing::debug!(len = text.len(), "message sent");
                self.observer.on_event(&SyncEvent::Sent);
                Ok(SubmitOutcome::Sent)
            }
            Err(err) => {
                tracing::warn!("Failed to send message: {err}");
                self.observer.on_event(&SyncEvent::SendFailed(err.clone()));
                Err(err)
            }
        }
    }
}
