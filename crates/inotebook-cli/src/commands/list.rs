use inotebook_core::RefreshSignal;

use crate::commands::common::{note_to_list_item, render_list, NoteListItem, NoteSession};
use crate::error::CliError;

pub async fn run_list(as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let session = NoteSession::open(global_profile)?;
    let mut synchronizer = session.synchronizer(RefreshSignal::new());
    synchronizer.activate(&session.store).await;

    let lines = render_list(&synchronizer)?;
    if as_json {
        let json_items = synchronizer
            .notes()
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in lines {
            println!("{line}");
        }
    }

    Ok(())
}
