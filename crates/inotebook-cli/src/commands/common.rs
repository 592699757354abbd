use std::env;
use std::sync::Arc;

use inotebook_core::{
    HttpNoteStore, ListDisplay, Note, NoteListSynchronizer, RefreshSignal, SessionGate,
    SessionProvider, StoreConfig,
};
use serde::Serialize;

use crate::auth::StoredSessionProvider;
use crate::config_profiles::{resolve_store_config, CliProfilesConfig, API_URL_ENV};
use crate::error::CliError;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Everything a note command needs: resolved settings, the session gate and
/// an HTTP client for the profile's store.
pub struct NoteSession {
    pub profile_name: String,
    pub config: StoreConfig,
    pub gate: SessionGate<StoredSessionProvider>,
    pub store: HttpNoteStore,
}

impl NoteSession {
    pub fn open(global_profile: Option<&str>) -> Result<Self, CliError> {
        let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = profiles.resolve_profile_name(global_profile);
        let config = resolve_store_config(
            env::var(API_URL_ENV).ok(),
            profiles.profile(&profile_name),
        )?;
        let provider = StoredSessionProvider::load(&profile_name);
        tracing::debug!(
            "Opened profile '{profile_name}' against {}",
            config.base_url
        );
        Self::from_parts(profile_name, config, provider)
    }

    pub fn from_parts(
        profile_name: String,
        config: StoreConfig,
        provider: StoredSessionProvider,
    ) -> Result<Self, CliError> {
        let store = HttpNoteStore::from_config(&config)?;
        Ok(Self {
            profile_name,
            config,
            gate: SessionGate::new(Arc::new(provider)),
            store,
        })
    }

    pub fn synchronizer(
        &self,
        refresh: RefreshSignal,
    ) -> NoteListSynchronizer<StoredSessionProvider> {
        NoteListSynchronizer::new(self.gate.clone(), refresh)
    }
}

/// Lines for the current list view, or the view's failure message.
pub fn render_list<P: SessionProvider>(
    synchronizer: &NoteListSynchronizer<P>,
) -> Result<Vec<String>, CliError> {
    match synchronizer.display() {
        ListDisplay::Failed { message } => Err(CliError::LoadFailed(message.to_string())),
        ListDisplay::Loading => Ok(vec!["Loading...".to_string()]),
        ListDisplay::Empty => Ok(vec!["No notes yet.".to_string()]),
        ListDisplay::Notes(notes) => Ok(format_note_lines(notes)),
    }
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let id_width = notes
        .iter()
        .map(|note| note.id.chars().count())
        .max()
        .unwrap_or(0)
        .min(13);
    notes
        .iter()
        .map(|note| {
            let short_id = note.id.chars().take(13).collect::<String>();
            let title = note_preview(&note.title, 30);
            let description = note_preview(&note.description, 50);
            format!("{short_id:<id_width$}  {title:<30}  {description}")
        })
        .collect()
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id.clone(),
        title: note.title.clone(),
        description: note.description.clone(),
    }
}

pub fn note_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}
