use inotebook_core::{DeleteOutcome, FetchOutcome, RefreshSignal};

use crate::commands::common::{normalize_note_identifier, NoteSession};
use crate::error::CliError;

pub async fn run_delete(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let id = normalize_note_identifier(id)?;
    let session = NoteSession::open(global_profile)?;
    println!("{}", delete_note(&session, &id).await?);
    Ok(())
}

/// Load the list, then remove `id` optimistically and confirm remotely.
pub async fn delete_note(session: &NoteSession, id: &str) -> Result<String, CliError> {
    let mut synchronizer = session.synchronizer(RefreshSignal::new());

    if let FetchOutcome::Failed(error) = synchronizer.activate(&session.store).await {
        tracing::warn!("Could not load notes before delete: {error}");
    }
    if !synchronizer.notes().iter().any(|note| note.id == id) {
        tracing::debug!("Note {id} is not in the loaded list; deleting anyway");
    }

    let outcome = match synchronizer.delete(id, &session.store).await {
        Ok(outcome) => outcome,
        Err(error) => {
            let message = synchronizer
                .delete_error()
                .unwrap_or("Failed to delete note.")
                .to_string();
            return Err(CliError::Rejected { message, error });
        }
    };

    match outcome {
        DeleteOutcome::Confirmed(_) => Ok(format!("Deleted note {id}")),
        DeleteOutcome::FailedKeptRemoved(error) => Err(CliError::DeleteFailed {
            id: id.to_string(),
            error,
        }),
    }
}
