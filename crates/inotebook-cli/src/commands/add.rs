use inotebook_core::{FetchOutcome, NoteComposer, NoteIdGenerator, RefreshSignal};

use crate::commands::common::NoteSession;
use crate::error::CliError;

pub async fn run_add(
    title: &str,
    description: &str,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let session = NoteSession::open(global_profile)?;
    println!("{}", add_note(&session, title, description).await?);
    Ok(())
}

/// Submit one note and pick up the refreshed list it triggers.
pub async fn add_note(
    session: &NoteSession,
    title: &str,
    description: &str,
) -> Result<String, CliError> {
    let refresh = RefreshSignal::new();
    let mut synchronizer = session.synchronizer(refresh.clone());
    let mut composer = NoteComposer::with_id_generator(
        session.gate.clone(),
        refresh,
        NoteIdGenerator::new(session.config.id_strategy),
    );

    composer.set_title(title);
    composer.set_description(description);
    let note = match composer.submit(&session.store).await {
        Ok(note) => note,
        Err(error) => {
            let message = composer.error().unwrap_or("Failed to add note").to_string();
            return Err(CliError::Rejected { message, error });
        }
    };

    // The successful create bumped the refresh signal.
    match synchronizer.sync(&session.store).await {
        Some(FetchOutcome::Applied) => Ok(format!(
            "{} ({} notes in '{}')",
            note.id,
            synchronizer.notes().len(),
            session.profile_name
        )),
        _ => Ok(note.id),
    }
}
