//! Session provider boundary and the gate the core consults before every
//! remote call.

mod gate;

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

pub use gate::{GateStatus, SessionGate, SignOutOutcome};

/// Opaque bearer token issued by the session provider.
///
/// Clones share identity. A token re-issued by the provider is a new
/// identity even when its text is unchanged, which is what list
/// re-fetching keys on.
#[derive(Clone)]
pub struct Credential(Arc<str>);

impl Credential {
    /// Wrap a raw token. Blank tokens are not credentials.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(Arc::from(token)))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both values came from the same issuance.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Credential([REDACTED])")
    }
}

/// Compare two optional credentials by identity.
pub(crate) fn same_session(left: Option<&Credential>, right: Option<&Credential>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(left), Some(right)) => left.same_identity(right),
        _ => false,
    }
}

/// Point-in-time view of the session provider.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// The provider is still resolving the session
    pub is_loading: bool,
    /// Current bearer credential, if signed in
    pub credential: Option<Credential>,
    /// Last provider failure, for display
    pub error: Option<String>,
    /// Email or subject of the signed-in user
    pub user_label: Option<String>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn signed_in(credential: Credential, user_label: Option<String>) -> Self {
        Self {
            credential: Some(credential),
            user_label,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// External identity boundary. Redirect flows, token formats and refresh
/// happen behind this trait.
pub trait SessionProvider: Send + Sync {
    /// Current session state; may change between calls
    fn snapshot(&self) -> SessionSnapshot;

    /// Start the provider's sign-in flow
    fn begin_sign_in(&self) -> Result<()>;

    /// Start the provider's sign-out flow
    fn begin_sign_out(&self, post_logout_target: Option<&str>) -> Result<()>;

    /// Drop the local session without contacting the identity provider
    fn discard_local_session(&self);
}
