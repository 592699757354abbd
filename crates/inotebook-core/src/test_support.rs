//! Deterministic fakes for the store and session boundaries.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::Note;
use crate::session::{Credential, SessionProvider, SessionSnapshot};
use crate::store::{ensure_credential, DeleteConfirmation, NoteStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List { credential: String },
    Create { note: Note, credential: String },
    Delete { id: String, credential: String },
}

#[derive(Debug, Default)]
struct FakeStoreState {
    notes: Vec<Note>,
    calls: Vec<StoreCall>,
    list_failures: VecDeque<Error>,
    create_failure: Option<Error>,
    delete_failure: Option<Error>,
}

/// In-memory store that records every call that reached "the network".
#[derive(Debug, Default)]
pub struct FakeNoteStore {
    state: Mutex<FakeStoreState>,
}

impl FakeNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().notes = notes;
        store
    }

    pub fn set_notes(&self, notes: Vec<Note>) {
        self.state.lock().unwrap().notes = notes;
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.lock().unwrap().notes.clone()
    }

    pub fn fail_next_list(&self, error: Error) {
        self.state.lock().unwrap().list_failures.push_back(error);
    }

    pub fn fail_next_create(&self, error: Error) {
        self.state.lock().unwrap().create_failure = Some(error);
    }

    pub fn fail_next_delete(&self, error: Error) {
        self.state.lock().unwrap().delete_failure = Some(error);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.count(|call| matches!(call, StoreCall::List { .. }))
    }

    pub fn create_calls(&self) -> usize {
        self.count(|call| matches!(call, StoreCall::Create { .. }))
    }

    pub fn delete_calls(&self) -> usize {
        self.count(|call| matches!(call, StoreCall::Delete { .. }))
    }

    fn count(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }
}

#[async_trait]
impl NoteStore for FakeNoteStore {
    async fn list(&self, credential: &str) -> Result<Vec<Note>> {
        let credential = ensure_credential(credential)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::List {
            credential: credential.to_string(),
        });
        match state.list_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(state.notes.clone()),
        }
    }

    async fn create(&self, note: &Note, credential: &str) -> Result<Note> {
        let credential = ensure_credential(credential)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Create {
            note: note.clone(),
            credential: credential.to_string(),
        });
        if let Some(error) = state.create_failure.take() {
            return Err(error);
        }
        state.notes.push(note.clone());
        Ok(note.clone())
    }

    async fn delete(&self, id: &str, credential: &str) -> Result<DeleteConfirmation> {
        let credential = ensure_credential(credential)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Delete {
            id: id.to_string(),
            credential: credential.to_string(),
        });
        if let Some(error) = state.delete_failure.take() {
            return Err(error);
        }
        state.notes.retain(|note| note.id != id);
        Ok(DeleteConfirmation(
            serde_json::json!({ "message": "deleted" }),
        ))
    }
}

/// Session provider whose state tests flip directly.
#[derive(Debug, Default)]
pub struct FakeSessionProvider {
    snapshot: Mutex<SessionSnapshot>,
    sign_in_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
    discard_calls: AtomicUsize,
    fail_sign_out: AtomicBool,
}

impl FakeSessionProvider {
    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn signed_in(token: &str) -> Arc<Self> {
        let provider = Self::default();
        provider.sign_in_with(token);
        Arc::new(provider)
    }

    pub fn set_snapshot(&self, snapshot: SessionSnapshot) {
        *self.snapshot.lock().unwrap() = snapshot;
    }

    /// Issue a fresh credential, as a provider does on sign-in or refresh.
    pub fn sign_in_with(&self, token: &str) -> Credential {
        let credential = Credential::new(token).expect("non-blank test token");
        self.set_snapshot(SessionSnapshot::signed_in(credential.clone(), None));
        credential
    }

    /// Signed in, but with a token refresh still in flight.
    pub fn refreshing(&self, token: &str) {
        let credential = Credential::new(token).expect("non-blank test token");
        self.set_snapshot(SessionSnapshot {
            is_loading: true,
            ..SessionSnapshot::signed_in(credential, None)
        });
    }

    pub fn sign_out_now(&self) {
        self.set_snapshot(SessionSnapshot::default());
    }

    pub fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn discard_calls(&self) -> usize {
        self.discard_calls.load(Ordering::SeqCst)
    }
}

impl SessionProvider for FakeSessionProvider {
    fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.lock().unwrap().clone()
    }

    fn begin_sign_in(&self) -> Result<()> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn begin_sign_out(&self, _post_logout_target: Option<&str>) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(Error::Session("sign-out redirect failed".to_string()));
        }
        self.sign_out_now();
        Ok(())
    }

    fn discard_local_session(&self) {
        self.discard_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_out_now();
    }
}
