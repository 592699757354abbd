use std::sync::Arc;

use inotebook_core::{GateStatus, SessionGate, SignOutOutcome};

use crate::auth::{StoredSessionProvider, TokenSource, ACCESS_TOKEN_ENV};
use crate::cli::AuthCommands;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Login {
            profile,
            token,
            user,
        } => {
            let profile_name = resolve_profile(profile.as_deref().or(global_profile))?;
            let provider = StoredSessionProvider::load(&profile_name);
            provider
                .login(&token, user)
                .map_err(|error| CliError::Auth(error.to_string()))?;
            if provider.token_source() == Some(TokenSource::Environment) {
                println!(
                    "Stored token for profile '{profile_name}', but {ACCESS_TOKEN_ENV} is set and takes precedence"
                );
            } else {
                println!("Signed in profile '{profile_name}'");
            }
            Ok(())
        }
        AuthCommands::Status { profile } => {
            let profile_name = resolve_profile(profile.as_deref().or(global_profile))?;
            let gate = SessionGate::new(Arc::new(StoredSessionProvider::load(&profile_name)));
            println!("{}", describe_status(&profile_name, &gate.status()));
            Ok(())
        }
        AuthCommands::Logout { profile } => {
            let profile_name = resolve_profile(profile.as_deref().or(global_profile))?;
            let provider = StoredSessionProvider::load(&profile_name);
            println!("{}", sign_out_profile(&profile_name, provider)?);
            Ok(())
        }
    }
}

/// Sign the profile out, failing when the keychain still holds its token.
pub fn sign_out_profile(
    profile_name: &str,
    provider: StoredSessionProvider,
) -> Result<String, CliError> {
    let gate = SessionGate::new(Arc::new(provider));
    let from_env = gate.provider().token_source() == Some(TokenSource::Environment);
    match gate.sign_out(None) {
        SignOutOutcome::Completed => Ok(format!("Signed out profile '{profile_name}'")),
        SignOutOutcome::LocalFallback(_) if from_env => Ok(format!(
            "Signed out profile '{profile_name}' for this run; unset {ACCESS_TOKEN_ENV} to stay signed out"
        )),
        SignOutOutcome::LocalFallback(error) => Err(CliError::Auth(format!(
            "Failed to remove stored token for profile '{profile_name}': {error}"
        ))),
    }
}

fn resolve_profile(explicit: Option<&str>) -> Result<String, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    Ok(config.resolve_profile_name(explicit))
}

pub fn describe_status(profile_name: &str, status: &GateStatus) -> String {
    match status {
        GateStatus::Loading => format!("Profile '{profile_name}' session is loading."),
        GateStatus::Failed(message) => {
            format!("Profile '{profile_name}' session error: {message}")
        }
        GateStatus::SignedOut => format!("Profile '{profile_name}' is not signed in."),
        GateStatus::SignedIn {
            user_label: Some(label),
        } => format!("Profile '{profile_name}' is signed in as {label}"),
        GateStatus::SignedIn { user_label: None } => {
            format!("Profile '{profile_name}' is signed in")
        }
    }
}
