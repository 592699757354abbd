//! Error types for inotebook-core

use thiserror::Error;

/// Result type alias using inotebook-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in inotebook-core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No credential was available when the operation started
    #[error("Missing access token for authenticated request")]
    Auth,

    /// A required field was empty after trimming
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The remote store answered with a non-success status
    #[error("Remote store error: {message} ({status})")]
    Remote { status: u16, message: String },

    /// The request never reached the remote store, or its reply was unreadable
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The session provider failed to perform an action
    #[error("Session provider error: {0}")]
    Session(String),

    /// The provider is still settling the session; mutations wait
    #[error("Session is still loading")]
    SessionLoading,

    /// A submission is already in flight
    #[error("A note submission is already in progress")]
    Busy,
}

impl Error {
    /// Whether this error came back from a remote call (as opposed to a
    /// local fail-fast check that never touched the network).
    #[must_use]
    pub const fn is_remote_failure(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}
