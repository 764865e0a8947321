//! Client-side synchronization with the message board.
//!
//! - [`Poller`] refreshes [`DisplayState`] from the backend on a fixed interval.
//! - [`Transmitter`] sends the [`DraftInput`] and clears it on success.
//! - [`Session`] owns both and controls the poll timer's lifetime.

mod display;
mod draft;
mod error;
mod gate;
mod observer;
mod poller;
mod session;
mod transmitter;

pub use display::{DisplayState, MessageList};
pub use draft::DraftInput;
pub use error::{SessionError, SyncError};
pub use gate::{Gate, Generation};
pub use observer::{ChannelObserver, LogOnly, SyncEvent, SyncObserver};
pub use poller::{PollOutcome, Poller};
pub use session::Session;
pub use transmitter::{SubmitOutcome, Transmitter};
