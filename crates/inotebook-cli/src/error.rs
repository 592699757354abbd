use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] inotebook_core::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        error: inotebook_core::Error,
    },
    #[error("{0}")]
    LoadFailed(String),
    #[error("Note {id} was removed from the list but the remote delete failed: {error}")]
    DeleteFailed {
        id: String,
        error: inotebook_core::Error,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error(
        "Notes API is not configured. Run `inotebook config init --api-url <URL>` or set INOTEBOOK_API_URL."
    )]
    NotConfigured,
}
