//! Remote note store contract.
//!
//! Three operations over the notes collection, each carrying the caller's
//! bearer credential. Implementations are stateless across calls.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Note;

pub use http::HttpNoteStore;

/// Opaque payload the remote store returns for a successful delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeleteConfirmation(pub serde_json::Value);

/// Operations the client performs against the remote note store.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fetch every note visible to the credential, in remote order
    async fn list(&self, credential: &str) -> Result<Vec<Note>>;

    /// Persist a note whose id, title and description are already final
    async fn create(&self, note: &Note, credential: &str) -> Result<Note>;

    /// Delete a note by id
    async fn delete(&self, id: &str, credential: &str) -> Result<DeleteConfirmation>;
}

/// Reject a blank credential before any network traffic happens.
pub fn ensure_credential(credential: &str) -> Result<&str> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(Error::Auth);
    }
    Ok(credential)
}
