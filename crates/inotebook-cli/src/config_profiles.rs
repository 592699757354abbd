//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use inotebook_core::util::normalize_text_option;
use inotebook_core::{IdStrategy, StoreConfig};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";
pub const PROFILE_ENV: &str = "INOTEBOOK_PROFILE";
pub const API_URL_ENV: &str = "INOTEBOOK_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub id_strategy: Option<IdStrategy>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("inotebook").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Explicit flag, then `INOTEBOOK_PROFILE`, then the active profile.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        self.resolve_profile_name_with_env(
            explicit,
            std::env::var(PROFILE_ENV).ok().as_deref(),
        )
    }

    pub fn resolve_profile_name_with_env(
        &self,
        explicit: Option<&str>,
        env_profile: Option<&str>,
    ) -> String {
        normalize_profile_name(explicit)
            .or_else(|| normalize_profile_name(env_profile))
            .or_else(|| normalize_profile_name(self.active_profile.as_deref()))
            .unwrap_or_else(|| "default".to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalize(&mut self) {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
    }
}

impl CliProfile {
    pub fn api_base_url(&self) -> Option<String> {
        normalize_text_option(self.api_base_url.clone())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.clone())
            .map(|url| url.trim_end_matches('/').to_string());
        self.request_timeout_secs = self.request_timeout_secs.filter(|secs| *secs > 0);
    }
}

/// Build the store settings for a profile. `env_api_url` wins over the
/// profile's saved base URL.
pub fn resolve_store_config(
    env_api_url: Option<String>,
    profile: Option<&CliProfile>,
) -> Result<StoreConfig, CliError> {
    let base_url = normalize_text_option(env_api_url)
        .or_else(|| profile.and_then(CliProfile::api_base_url))
        .ok_or(CliError::NotConfigured)?;

    let mut config = StoreConfig::new(base_url)?;
    if let Some(profile) = profile {
        if let Some(timeout) = profile.request_timeout() {
            config = config.with_request_timeout(timeout);
        }
        if let Some(strategy) = profile.id_strategy {
            config = config.with_id_strategy(strategy);
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir().join(format!(
            "inotebook-cli-config-test-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |duration| duration.as_nanos())
        ))
    }

    #[test]
    fn normalize_profile_name_rejects_empty() {
        assert_eq!(normalize_profile_name(None), None);
        assert_eq!(normalize_profile_name(Some(" ")), None);
        assert_eq!(normalize_profile_name(Some(" work ")), Some("work".to_string()));
    }

    #[test]
    fn config_roundtrip_preserves_profiles() {
        let path = temp_config_path();

        let mut config = CliProfilesConfig {
            version: 1,
            active_profile: Some(" default ".to_string()),
            profiles: BTreeMap::new(),
        };
        config.profiles.insert(
            "default".to_string(),
            CliProfile {
                api_base_url: Some(" https://api.example.com/dev/ ".to_string()),
                request_timeout_secs: Some(0),
                id_strategy: Some(IdStrategy::TimeOrdered),
            },
        );

        config.save_to_path(&path).unwrap();
        let loaded = CliProfilesConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.active_profile.as_deref(), Some("default"));
        let profile = loaded.profile("default").unwrap();
        assert_eq!(
            profile.api_base_url.as_deref(),
            Some("https://api.example.com/dev")
        );
        assert_eq!(profile.request_timeout_secs, None);
        assert_eq!(profile.id_strategy, Some(IdStrategy::TimeOrdered));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_config_file_loads_defaults() {
        let loaded = CliProfilesConfig::load_from_path(&temp_config_path()).unwrap();
        assert_eq!(loaded, CliProfilesConfig::default());
    }

    #[test]
    fn resolve_profile_name_prefers_explicit_then_env_then_active() {
        let config = CliProfilesConfig {
            version: 1,
            active_profile: Some("work".to_string()),
            profiles: BTreeMap::new(),
        };
        assert_eq!(
            config.resolve_profile_name_with_env(Some("mobile"), Some("env")),
            "mobile"
        );
        assert_eq!(config.resolve_profile_name_with_env(None, Some("env")), "env");
        assert_eq!(config.resolve_profile_name_with_env(None, Some(" ")), "work");
        assert_eq!(
            CliProfilesConfig::default().resolve_profile_name_with_env(None, None),
            "default"
        );
    }

    #[test]
    fn store_config_prefers_env_url_over_profile() {
        let profile = CliProfile {
            api_base_url: Some("https://saved.example.com".to_string()),
            request_timeout_secs: Some(5),
            id_strategy: Some(IdStrategy::TimeOrdered),
        };

        let config =
            resolve_store_config(Some("https://env.example.com/".to_string()), Some(&profile))
                .unwrap();
        assert_eq!(config.base_url, "https://env.example.com");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.id_strategy, IdStrategy::TimeOrdered);

        let config = resolve_store_config(None, Some(&profile)).unwrap();
        assert_eq!(config.base_url, "https://saved.example.com");
    }

    #[test]
    fn store_config_requires_a_base_url() {
        let error = resolve_store_config(None, None).unwrap_err();
        assert!(matches!(error, CliError::NotConfigured));

        let error = resolve_store_config(Some("api.example.com".to_string()), None).unwrap_err();
        assert!(matches!(
            error,
            CliError::Core(inotebook_core::Error::InvalidConfiguration(_))
        ));
    }
}
