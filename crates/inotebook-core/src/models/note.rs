//! Note model

use serde::{Deserialize, Serialize};

/// A note as persisted by the remote store.
///
/// The remote store speaks `notesId`/`title`/`desc`; the Rust side uses
/// descriptive names and maps them on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// Client-assigned identifier, immutable once created
    #[serde(rename = "notesId")]
    pub id: String,
    /// Non-empty trimmed title
    #[serde(default)]
    pub title: String,
    /// Non-empty trimmed description
    #[serde(rename = "desc", default)]
    pub description: String,
}

impl Note {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Unsaved note under composition. Has no identifier until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub description: String,
}

impl NoteDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Returns the trimmed `(title, description)` pair, or `None` when
    /// either field is blank.
    #[must_use]
    pub fn validated(&self) -> Option<(String, String)> {
        let title = self.title.trim();
        let description = self.description.trim();
        if title.is_empty() || description.is_empty() {
            None
        } else {
            Some((title.to_string(), description.to_string()))
        }
    }

    /// Check if both fields are empty (untouched draft)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn note_uses_remote_field_names() {
        let note = Note::new("123", "A", "a");
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "notesId": "123", "title": "A", "desc": "a" })
        );
    }

    #[test]
    fn note_parses_remote_payload() {
        let note: Note =
            serde_json::from_str(r#"{"notesId":"4821","title":"Groceries","desc":"milk"}"#)
                .unwrap();
        assert_eq!(note, Note::new("4821", "Groceries", "milk"));
    }

    #[test]
    fn draft_validation_trims_fields() {
        let draft = NoteDraft::new("  Title ", "\tbody\n");
        assert_eq!(
            draft.validated(),
            Some(("Title".to_string(), "body".to_string()))
        );
    }

    #[test]
    fn draft_validation_rejects_blank_fields() {
        assert_eq!(NoteDraft::new("  ", "x").validated(), None);
        assert_eq!(NoteDraft::new("x", "").validated(), None);
        assert_eq!(NoteDraft::default().validated(), None);
    }

    #[test]
    fn draft_clear_empties_both_fields() {
        let mut draft = NoteDraft::new("a", "b");
        assert!(!draft.is_empty());
        draft.clear();
        assert!(draft.is_empty());
    }
}
