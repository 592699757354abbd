//! Session gate: the single decision point for "may this operation touch
//! the remote store".
//!
//! Nothing is cached here. Every call reads a fresh provider snapshot,
//! because sign-out, refresh or expiry can swap the credential at any time.

use std::sync::Arc;

use crate::error::{Error, Result};

use super::{Credential, SessionProvider, SessionSnapshot};

/// Summary of the session for a shell to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    /// Provider is still validating the session
    Loading,
    /// Provider reported an error; offer a sign-in retry
    Failed(String),
    /// No credential
    SignedOut,
    /// Credential present
    SignedIn { user_label: Option<String> },
}

/// Which path a sign-out took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutOutcome {
    /// The provider's own sign-out flow succeeded
    Completed,
    /// The provider flow failed; only the local session was dropped
    LocalFallback(Error),
}

/// Gate over an injected session provider.
pub struct SessionGate<P> {
    provider: Arc<P>,
}

impl<P> Clone for SessionGate<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: SessionProvider> SessionGate<P> {
    pub const fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.provider.snapshot()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().credential.is_some()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.snapshot().credential
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.snapshot().error
    }

    pub fn user_label(&self) -> Option<String> {
        self.snapshot().user_label
    }

    /// Mutating affordances are enabled only for a settled, signed-in session.
    pub fn can_mutate(&self) -> bool {
        let snapshot = self.snapshot();
        !snapshot.is_loading && snapshot.credential.is_some()
    }

    pub fn status(&self) -> GateStatus {
        let snapshot = self.snapshot();
        if snapshot.is_loading {
            GateStatus::Loading
        } else if let Some(error) = snapshot.error {
            GateStatus::Failed(error)
        } else if snapshot.credential.is_some() {
            GateStatus::SignedIn {
                user_label: snapshot.user_label,
            }
        } else {
            GateStatus::SignedOut
        }
    }

    /// Current credential, or `Error::Auth` when signed out.
    pub fn require_credential(&self) -> Result<Credential> {
        self.credential().ok_or(Error::Auth)
    }

    /// Credential for a mutating call. Refused while the provider is still
    /// loading, even if it already holds a credential.
    pub fn require_mutation_credential(&self) -> Result<Credential> {
        let snapshot = self.snapshot();
        if snapshot.is_loading {
            return Err(Error::SessionLoading);
        }
        snapshot.credential.ok_or(Error::Auth)
    }

    pub fn sign_in(&self) -> Result<()> {
        self.provider.begin_sign_in().inspect_err(|error| {
            tracing::error!("Error starting sign in: {error}");
        })
    }

    /// Re-invoke the provider's sign-in entry point after a session error.
    pub fn retry_sign_in(&self) -> Result<()> {
        if let Some(error) = self.last_error() {
            tracing::info!("Retrying sign in after session error: {error}");
        }
        self.sign_in()
    }

    /// Sign out through the provider, falling back to dropping the local
    /// session when the provider flow fails.
    pub fn sign_out(&self, post_logout_target: Option<&str>) -> SignOutOutcome {
        match self.provider.begin_sign_out(post_logout_target) {
            Ok(()) => SignOutOutcome::Completed,
            Err(error) => {
                tracing::warn!("Falling back to local sign-out: {error}");
                self.provider.discard_local_session();
                SignOutOutcome::LocalFallback(error)
            }
        }
    }
}
