//! Note list synchronizer: the client's belief about the remote note set.
//!
//! `Empty -> Loading -> {Loaded, LoadError}`, re-entering `Loading` when the
//! refresh signal moves or the credential identity changes. Fetches and
//! deletes are split into begin/complete halves so several can be
//! outstanding on one logical thread; the async helpers drive both halves.
//!
//! Every fetch is tagged with a generation. A completion that is not the
//! latest issued fetch, or that was issued under a credential the gate no
//! longer holds, is discarded instead of overwriting fresher state.

use crate::error::{Error, Result};
use crate::models::Note;
use crate::refresh::RefreshSignal;
use crate::session::{same_session, Credential, SessionGate, SessionProvider};
use crate::store::{DeleteConfirmation, NoteStore};

pub const SIGN_IN_MESSAGE: &str = "Sign in to load your notes.";
pub const LOAD_FAILED_MESSAGE: &str = "Something went wrong while loading notes.";
pub const DELETE_AUTH_MESSAGE: &str = "Sign in to delete notes.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete note.";
pub const DELETE_LOADING_MESSAGE: &str = "Your session is still loading. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Empty,
    Loading,
    Loaded,
    LoadError,
}

/// What a list view should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDisplay<'a> {
    /// Loading with nothing to show yet
    Loading,
    /// Load failed with nothing to show; offer retry
    Failed { message: &'a str },
    /// Nothing to show
    Empty,
    Notes(&'a [Note]),
}

/// Outcome of applying a fetch completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// List replaced with the fetched sequence
    Applied,
    /// Fetch failed; prior list kept (or empty on initial load)
    Failed(Error),
    /// A newer fetch or a different session superseded this one
    Discarded,
    /// No credential; list cleared without a network call
    SignedOut,
}

/// Outcome of a delete whose local removal already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Confirmed(DeleteConfirmation),
    /// Remote delete failed. The optimistic removal stays in place until the
    /// next full refresh.
    FailedKeptRemoved(Error),
}

/// An issued fetch awaiting its result.
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    credential: Credential,
}

impl FetchTicket {
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn credential(&self) -> &str {
        self.credential.as_str()
    }
}

/// An issued remote delete awaiting its result.
#[derive(Debug)]
pub struct DeleteTicket {
    id: String,
    credential: Credential,
}

impl DeleteTicket {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn credential(&self) -> &str {
        self.credential.as_str()
    }
}

pub struct NoteListSynchronizer<P> {
    gate: SessionGate<P>,
    refresh: RefreshSignal,
    notes: Vec<Note>,
    state: ListState,
    error: Option<String>,
    delete_error: Option<String>,
    has_loaded: bool,
    activated: bool,
    observed_refresh: u64,
    observed_credential: Option<Credential>,
    latest_fetch: u64,
}

impl<P: SessionProvider> NoteListSynchronizer<P> {
    pub const fn new(gate: SessionGate<P>, refresh: RefreshSignal) -> Self {
        Self {
            gate,
            refresh,
            notes: Vec::new(),
            state: ListState::Empty,
            error: None,
            delete_error: None,
            has_loaded: false,
            activated: false,
            observed_refresh: 0,
            observed_credential: None,
            latest_fetch: 0,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub const fn state(&self) -> ListState {
        self.state
    }

    /// Message for the current `LoadError`, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message from the last rejected or failed delete.
    pub fn delete_error(&self) -> Option<&str> {
        self.delete_error.as_deref()
    }

    pub fn display(&self) -> ListDisplay<'_> {
        if self.notes.is_empty() {
            match (self.state, self.error.as_deref()) {
                (ListState::Loading, _) => ListDisplay::Loading,
                (_, Some(message)) => ListDisplay::Failed { message },
                _ => ListDisplay::Empty,
            }
        } else {
            ListDisplay::Notes(&self.notes)
        }
    }

    /// Whether the refresh signal or the session changed since the last fetch.
    pub fn needs_refresh(&self) -> bool {
        if !self.activated {
            return true;
        }
        if self.refresh.current() != self.observed_refresh {
            return true;
        }
        let current = self.gate.credential();
        !same_session(current.as_ref(), self.observed_credential.as_ref())
    }

    /// Enter `Loading`, or short-circuit to `LoadError` when signed out.
    ///
    /// Returns the ticket to fetch with, or `None` if no fetch is needed.
    pub fn begin_refresh(&mut self) -> Option<FetchTicket> {
        let credential = self.gate.credential();
        self.activated = true;
        self.observed_refresh = self.refresh.current();
        self.observed_credential.clone_from(&credential);
        self.latest_fetch += 1;

        let Some(credential) = credential else {
            tracing::debug!("No credential; skipping note fetch");
            self.notes.clear();
            self.has_loaded = false;
            self.state = ListState::LoadError;
            self.error = Some(SIGN_IN_MESSAGE.to_string());
            return None;
        };

        self.state = ListState::Loading;
        self.error = None;
        Some(FetchTicket {
            generation: self.latest_fetch,
            credential,
        })
    }

    pub fn complete_refresh(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Note>>,
    ) -> FetchOutcome {
        if ticket.generation != self.latest_fetch {
            tracing::debug!(
                "Discarding stale note fetch {} (latest {})",
                ticket.generation,
                self.latest_fetch
            );
            return FetchOutcome::Discarded;
        }
        let current = self.gate.credential();
        if !same_session(current.as_ref(), Some(&ticket.credential)) {
            tracing::debug!("Discarding note fetch issued under a replaced session");
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(notes) => {
                tracing::debug!("Loaded {} notes", notes.len());
                self.notes = notes;
                self.has_loaded = true;
                self.state = ListState::Loaded;
                self.error = None;
                FetchOutcome::Applied
            }
            Err(error) => {
                tracing::error!("Error fetching notes: {error}");
                if !self.has_loaded {
                    self.notes.clear();
                }
                self.state = ListState::LoadError;
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
                FetchOutcome::Failed(error)
            }
        }
    }

    /// Fetch unconditionally with the current session.
    pub async fn refresh<S: NoteStore + ?Sized>(&mut self, store: &S) -> FetchOutcome {
        let Some(ticket) = self.begin_refresh() else {
            return FetchOutcome::SignedOut;
        };
        let result = store.list(ticket.credential()).await;
        self.complete_refresh(ticket, result)
    }

    /// Initial load when a view first shows the list.
    pub async fn activate<S: NoteStore + ?Sized>(&mut self, store: &S) -> FetchOutcome {
        self.refresh(store).await
    }

    /// Re-enter `Loading` with the same parameters after a failure.
    pub async fn retry<S: NoteStore + ?Sized>(&mut self, store: &S) -> FetchOutcome {
        self.refresh(store).await
    }

    /// Fetch only if the refresh signal or the session changed.
    pub async fn sync<S: NoteStore + ?Sized>(&mut self, store: &S) -> Option<FetchOutcome> {
        if self.needs_refresh() {
            Some(self.refresh(store).await)
        } else {
            None
        }
    }

    /// Whether delete affordances should be enabled.
    pub fn can_delete(&self) -> bool {
        self.gate.can_mutate()
    }

    /// Remove the note locally and hand back the remote delete to issue.
    ///
    /// Signed out: `Error::Auth`; session still loading: `Error::SessionLoading`.
    /// Either way nothing is removed and nothing is sent.
    pub fn begin_delete(&mut self, id: &str) -> Result<DeleteTicket> {
        let credential = match self.gate.require_mutation_credential() {
            Ok(credential) => credential,
            Err(error) => {
                tracing::warn!("Refusing to delete note {id}: {error}");
                let message = if error == Error::SessionLoading {
                    DELETE_LOADING_MESSAGE
                } else {
                    DELETE_AUTH_MESSAGE
                };
                self.delete_error = Some(message.to_string());
                return Err(error);
            }
        };

        self.delete_error = None;
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        if self.notes.len() == before {
            tracing::debug!("Note {id} was not in the local list");
        }

        Ok(DeleteTicket {
            id: id.to_string(),
            credential,
        })
    }

    pub fn complete_delete(
        &mut self,
        ticket: DeleteTicket,
        result: Result<DeleteConfirmation>,
    ) -> DeleteOutcome {
        match result {
            Ok(confirmation) => {
                tracing::info!("Deleted note {}", ticket.id);
                DeleteOutcome::Confirmed(confirmation)
            }
            Err(error) => {
                tracing::error!("Error deleting note {}: {error}", ticket.id);
                self.delete_error = Some(DELETE_FAILED_MESSAGE.to_string());
                DeleteOutcome::FailedKeptRemoved(error)
            }
        }
    }

    pub async fn delete<S: NoteStore + ?Sized>(
        &mut self,
        id: &str,
        store: &S,
    ) -> Result<DeleteOutcome> {
        let ticket = self.begin_delete(id)?;
        let result = store.delete(ticket.id(), ticket.credential()).await;
        Ok(self.complete_delete(ticket, result))
    }
}
