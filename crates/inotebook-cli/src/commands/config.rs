use std::env;

use inotebook_core::config::normalize_base_url;
use inotebook_core::util::normalize_text_option;
use inotebook_core::IdStrategy;

use crate::cli::{ConfigCommands, IdStrategyArg};
use crate::config_profiles::{CliProfile, CliProfilesConfig, API_URL_ENV};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_url,
            timeout_secs,
            id_strategy,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            api_url,
            timeout_secs,
            id_strategy,
            no_activate,
        ),
        ConfigCommands::Show { profile } => run_config_show(profile.as_deref().or(global_profile)),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    id_strategy: Option<IdStrategyArg>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged = merge_profile(
        &existing_profile,
        api_url,
        env::var(API_URL_ENV).ok(),
        timeout_secs,
        id_strategy.map(IdStrategy::from),
    )?;
    *config.profile_mut_or_default(&profile_name) = merged;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let has_api_url = config
        .profile(&profile_name)
        .and_then(CliProfile::api_base_url)
        .is_some();
    if has_api_url {
        println!(
            "Profile '{profile_name}' is ready. Run `inotebook auth login --token <TOKEN>`."
        );
    } else {
        println!("Profile '{profile_name}' is missing: api_base_url");
    }

    Ok(())
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let active = config.active_profile.as_deref() == Some(profile_name.as_str());

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "profile": profile_name,
            "active": active,
            "api_base_url": profile.api_base_url(),
            "api_base_url_override": normalize_text_option(env::var(API_URL_ENV).ok()),
            "request_timeout_secs": profile.request_timeout_secs,
            "id_strategy": profile.id_strategy.unwrap_or_default(),
        }))?
    );
    Ok(())
}

/// Explicit flags win, then `INOTEBOOK_API_URL`, then what the profile already has.
pub fn merge_profile(
    existing: &CliProfile,
    explicit_api_url: Option<String>,
    env_api_url: Option<String>,
    timeout_secs: Option<u64>,
    id_strategy: Option<IdStrategy>,
) -> Result<CliProfile, CliError> {
    let api_base_url = normalize_text_option(explicit_api_url)
        .or_else(|| normalize_text_option(env_api_url))
        .or_else(|| existing.api_base_url())
        .map(|url| normalize_base_url(&url))
        .transpose()
        .map_err(|error| CliError::Config(error.to_string()))?;

    Ok(CliProfile {
        api_base_url,
        request_timeout_secs: timeout_secs
            .filter(|secs| *secs > 0)
            .or(existing.request_timeout_secs),
        id_strategy: id_strategy.or(existing.id_strategy),
    })
}
