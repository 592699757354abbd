//! Data models for iNoteBook

mod note;
mod note_id;

pub use note::{Note, NoteDraft};
pub use note_id::{short_numeric_id, time_ordered_id, IdStrategy, NoteIdGenerator};
