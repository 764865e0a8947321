use thiserror::Error;

/// Failure of a single poll or send attempt.
///
/// None of these are fatal to the session: the poller retries on its next
/// regular tick, and a failed send leaves the draft in place for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Network unreachable, timeout, or a non-2xx status while polling.
    #[error("message fetch failed: {0}")]
    TransientFetch(String),

    /// `/messages` answered, but not with a JSON array of strings.
    #[error("malformed message list: {0}")]
    MalformedResponse(String),

    /// `/send` failed to complete or the backend answered non-2xx.
    #[error("send rejected: {0}")]
    SendRejected(String),
}

impl SyncError {
    pub fn transient(err: impl std::fmt::Display) -> Self {
        Self::TransientFetch(err.to_string())
    }

    pub fn malformed(err: impl std::fmt::Display) -> Self {
        Self::MalformedResponse(err.to_string())
    }

    pub fn rejected(err: impl std::fmt::Display) -> Self {
        Self::SendRejected(err.to_string())
    }
}

/// Misuse of the session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is already running; stop it before starting again")]
    AlreadyRunning,

    #[error("session start requires a tokio runtime")]
    NoRuntime,
}
