//! Remote store configuration.
//!
//! The only address the core needs is the note store base URL. Identity
//! provider settings belong to the shell that owns the session provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::IdStrategy;
use crate::util::{is_http_url, normalize_text_option};

/// Validated settings for talking to the remote note store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Normalized base URL, without a trailing slash
    pub base_url: String,
    /// Per-request timeout; `None` leaves it to the HTTP client default
    #[serde(default)]
    pub request_timeout: Option<Duration>,
    /// Identifier scheme for newly created notes
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl StoreConfig {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            request_timeout: None,
            id_strategy: IdStrategy::default(),
        })
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }
}

/// Trim and validate a store base URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let base = normalize_text_option(Some(raw.to_string())).ok_or_else(|| {
        Error::InvalidConfiguration("API base URL must not be empty".to_string())
    })?;
    if !is_http_url(&base) {
        return Err(Error::InvalidConfiguration(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base.trim_end_matches('/').to_string())
}
