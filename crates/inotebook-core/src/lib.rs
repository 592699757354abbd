//! inotebook-core - Core library for iNoteBook
//!
//! This crate contains the remote note store client, the session gate, and
//! the two client-side state machines (note composer and note list
//! synchronizer) shared by every iNoteBook shell.

pub mod composer;
pub mod config;
pub mod error;
pub mod models;
pub mod refresh;
pub mod session;
pub mod store;
pub mod synchronizer;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

pub use composer::{ComposerState, NoteComposer};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use models::{IdStrategy, Note, NoteDraft, NoteIdGenerator};
pub use refresh::RefreshSignal;
pub use session::{
    Credential, GateStatus, SessionGate, SessionProvider, SessionSnapshot, SignOutOutcome,
};
pub use store::{DeleteConfirmation, HttpNoteStore, NoteStore};
pub use synchronizer::{DeleteOutcome, FetchOutcome, ListDisplay, ListState, NoteListSynchronizer};
