//! Note composer: owns the draft of a single new note and drives it through
//! validation and submission.
//!
//! `Idle -> Validating -> Submitting -> Idle`. Validation and auth failures
//! never reach the store. A successful create clears the draft and bumps the
//! shared refresh signal so the list synchronizer re-fetches.

use crate::error::{Error, Result};
use crate::models::{IdStrategy, Note, NoteDraft, NoteIdGenerator};
use crate::refresh::RefreshSignal;
use crate::session::{Credential, SessionGate, SessionProvider};
use crate::store::NoteStore;

pub const VALIDATION_MESSAGE: &str = "Title and Description are required";
pub const AUTH_MESSAGE: &str = "You must be signed in to add notes.";
pub const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";
pub const SESSION_LOADING_MESSAGE: &str = "Your session is still loading. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Idle,
    Validating,
    Submitting,
}

/// A validated note on its way to the store.
#[derive(Debug)]
pub struct CreateTicket {
    note: Note,
    credential: Credential,
}

impl CreateTicket {
    pub const fn note(&self) -> &Note {
        &self.note
    }

    pub fn credential(&self) -> &str {
        self.credential.as_str()
    }
}

pub struct NoteComposer<P> {
    gate: SessionGate<P>,
    refresh: RefreshSignal,
    ids: NoteIdGenerator,
    draft: NoteDraft,
    state: ComposerState,
    error: Option<String>,
}

impl<P: SessionProvider> NoteComposer<P> {
    pub fn new(gate: SessionGate<P>, refresh: RefreshSignal) -> Self {
        Self::with_id_generator(gate, refresh, NoteIdGenerator::new(IdStrategy::default()))
    }

    pub const fn with_id_generator(
        gate: SessionGate<P>,
        refresh: RefreshSignal,
        ids: NoteIdGenerator,
    ) -> Self {
        Self {
            gate,
            refresh,
            ids,
            draft: NoteDraft {
                title: String::new(),
                description: String::new(),
            },
            state: ComposerState::Idle,
            error: None,
        }
    }

    pub const fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub const fn state(&self) -> ComposerState {
        self.state
    }

    /// User-visible message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        self.state != ComposerState::Submitting && self.gate.can_mutate()
    }

    pub fn submit_label(&self) -> &'static str {
        if !self.gate.is_authenticated() {
            "Sign in to add notes"
        } else if self.state == ComposerState::Submitting {
            "Saving..."
        } else {
            "Add note"
        }
    }

    /// Validate the draft and claim the single submission slot.
    ///
    /// On error the composer is back in `Idle` with the draft untouched.
    pub fn begin_submit(&mut self) -> Result<CreateTicket> {
        if self.state == ComposerState::Submitting {
            return Err(Error::Busy);
        }
        self.error = None;
        self.state = ComposerState::Validating;

        let Some((title, description)) = self.draft.validated() else {
            return Err(self.reject(Error::Validation(VALIDATION_MESSAGE.to_string())));
        };

        let credential = match self.gate.require_mutation_credential() {
            Ok(credential) => credential,
            Err(error) => return Err(self.reject(error)),
        };

        let note = Note {
            id: self.ids.generate(),
            title,
            description,
        };
        self.state = ComposerState::Submitting;
        Ok(CreateTicket { note, credential })
    }

    /// Apply the store's answer to a ticket from [`Self::begin_submit`].
    pub fn complete_submit(&mut self, ticket: CreateTicket, result: Result<Note>) -> Result<Note> {
        self.state = ComposerState::Idle;
        match result {
            Ok(created) => {
                tracing::info!("Created note {}", created.id);
                self.draft.clear();
                self.refresh.bump();
                Ok(created)
            }
            Err(error) => {
                tracing::error!("Error adding note {}: {error}", ticket.note.id);
                self.error = Some(user_message(&error).to_string());
                Err(error)
            }
        }
    }

    pub async fn submit<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<Note> {
        let ticket = self.begin_submit()?;
        let result = store.create(ticket.note(), ticket.credential()).await;
        self.complete_submit(ticket, result)
    }

    fn reject(&mut self, error: Error) -> Error {
        tracing::debug!("Rejected note submission: {error}");
        self.state = ComposerState::Idle;
        self.error = Some(user_message(&error).to_string());
        error
    }
}

const fn user_message(error: &Error) -> &'static str {
    match error {
        Error::Validation(_) => VALIDATION_MESSAGE,
        Error::Auth => AUTH_MESSAGE,
        Error::SessionLoading => SESSION_LOADING_MESSAGE,
        _ => SUBMIT_FAILED_MESSAGE,
    }
}
