//! Bearer-token session provider with secure keychain persistence.

#[cfg(test)]
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
#[cfg(test)]
use std::sync::OnceLock;

#[cfg(not(test))]
use keyring::Entry;

use inotebook_core::util::normalize_text_option;
use inotebook_core::{Credential, Error, Result, SessionProvider, SessionSnapshot};
use serde::{Deserialize, Serialize};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "inotebook-cli";
pub const ACCESS_TOKEN_ENV: &str = "INOTEBOOK_ACCESS_TOKEN";

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub user_label: Option<String>,
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("access_token", &"[REDACTED]")
            .field("user_label", &self.user_label)
            .finish()
    }
}

#[derive(Clone)]
struct TokenStore {
    username: String,
}

impl TokenStore {
    fn new(profile_name: &str) -> Self {
        Self {
            username: format!("access_token:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(test)]
    fn failing_clears() -> &'static Mutex<HashSet<String>> {
        static FAILING: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
        FAILING.get_or_init(|| Mutex::new(HashSet::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::Session(error.to_string()))
    }

    #[cfg(not(test))]
    fn load(&self) -> Result<Option<StoredSession>> {
        match self.entry()?.get_password() {
            Ok(raw) => decode_session(&raw).map(Some),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Session(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<StoredSession>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Session(error.to_string()))?;
        guard.get(&self.username).map(|raw| decode_session(raw)).transpose()
    }

    #[cfg(not(test))]
    fn save(&self, session: &StoredSession) -> Result<()> {
        let raw = encode_session(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| Error::Session(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, session: &StoredSession) -> Result<()> {
        let raw = encode_session(session)?;
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Session(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Session(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> Result<()> {
        let failing = Self::failing_clears()
            .lock()
            .map_err(|error| Error::Session(error.to_string()))?
            .contains(&self.username);
        if failing {
            return Err(Error::Session(
                "Platform secure storage failure: keychain is locked".to_string(),
            ));
        }
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Session(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Make every keychain delete for the profile fail.
#[cfg(test)]
pub fn fail_keychain_clear(profile_name: &str) {
    let username = TokenStore::new(profile_name).username;
    if let Ok(mut failing) = TokenStore::failing_clears().lock() {
        failing.insert(username);
    }
}

fn encode_session(session: &StoredSession) -> Result<String> {
    serde_json::to_string(session).map_err(|error| Error::Session(error.to_string()))
}

fn decode_session(raw: &str) -> Result<StoredSession> {
    serde_json::from_str(raw)
        .map_err(|error| Error::Session(format!("Stored session is unreadable: {error}")))
}

/// Where the current credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keychain,
}

#[derive(Debug, Default)]
struct ProviderState {
    credential: Option<Credential>,
    user_label: Option<String>,
    error: Option<String>,
    source: Option<TokenSource>,
}

/// Session provider for the CLI. A token in `INOTEBOOK_ACCESS_TOKEN` takes
/// precedence over the one stored in the keychain for the profile.
pub struct StoredSessionProvider {
    profile_name: String,
    env_token: Option<String>,
    store: TokenStore,
    state: Mutex<ProviderState>,
}

impl StoredSessionProvider {
    pub fn load(profile_name: &str) -> Self {
        Self::with_env_token(profile_name, std::env::var(ACCESS_TOKEN_ENV).ok())
    }

    pub fn with_env_token(profile_name: &str, env_token: Option<String>) -> Self {
        let provider = Self {
            profile_name: profile_name.to_string(),
            env_token: normalize_text_option(env_token),
            store: TokenStore::new(profile_name),
            state: Mutex::new(ProviderState::default()),
        };
        provider.reload();
        provider
    }

    pub fn token_source(&self) -> Option<TokenSource> {
        self.state().source
    }

    /// Persist a token for the profile and make it the current session.
    pub fn login(&self, access_token: &str, user_label: Option<String>) -> Result<()> {
        let credential = Credential::new(access_token)
            .ok_or_else(|| Error::Session("Access token must not be empty".to_string()))?;
        let session = StoredSession {
            access_token: credential.as_str().to_string(),
            user_label: normalize_text_option(user_label),
        };
        self.store.save(&session)?;
        tracing::debug!("Stored access token for profile '{}'", self.profile_name);

        if self.env_token.is_none() {
            let mut state = self.state();
            *state = ProviderState {
                credential: Some(credential),
                user_label: session.user_label,
                error: None,
                source: Some(TokenSource::Keychain),
            };
        }
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-read the session from the environment or keychain. Each reload
    /// issues a fresh credential identity.
    fn reload(&self) -> bool {
        let next = if let Some(token) = self.env_token.as_deref() {
            ProviderState {
                credential: Credential::new(token),
                source: Some(TokenSource::Environment),
                ..ProviderState::default()
            }
        } else {
            match self.store.load() {
                Ok(Some(session)) => ProviderState {
                    credential: Credential::new(&session.access_token),
                    user_label: session.user_label,
                    error: None,
                    source: Some(TokenSource::Keychain),
                },
                Ok(None) => ProviderState::default(),
                Err(error) => {
                    tracing::warn!(
                        "Failed to load session for profile '{}': {error}",
                        self.profile_name
                    );
                    ProviderState {
                        error: Some(error.to_string()),
                        ..ProviderState::default()
                    }
                }
            }
        };

        let signed_in = next.credential.is_some();
        *self.state() = next;
        signed_in
    }
}

impl SessionProvider for StoredSessionProvider {
    fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            is_loading: false,
            credential: state.credential.clone(),
            error: state.error.clone(),
            user_label: state.user_label.clone(),
        }
    }

    fn begin_sign_in(&self) -> Result<()> {
        if self.reload() {
            Ok(())
        } else {
            Err(Error::Session(format!(
                "No access token for profile '{}'. Run `inotebook auth login --token <TOKEN>` or set {ACCESS_TOKEN_ENV}.",
                self.profile_name
            )))
        }
    }

    fn begin_sign_out(&self, post_logout_target: Option<&str>) -> Result<()> {
        if self.token_source() == Some(TokenSource::Environment) {
            return Err(Error::Session(format!(
                "Access token comes from {ACCESS_TOKEN_ENV}; unset it to stay signed out"
            )));
        }
        self.store.clear()?;
        if let Some(target) = post_logout_target {
            tracing::debug!("Ignoring post-logout target {target} in CLI");
        }
        *self.state() = ProviderState::default();
        Ok(())
    }

    fn discard_local_session(&self) {
        *self.state() = ProviderState::default();
    }
}
