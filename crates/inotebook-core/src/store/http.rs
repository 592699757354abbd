//! HTTP implementation of the note store contract.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::models::Note;
use crate::util::compact_text;

use super::{ensure_credential, DeleteConfirmation, NoteStore};

/// Note store client backed by the remote notes API.
#[derive(Debug, Clone)]
pub struct HttpNoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNoteStore {
    /// Builds a client for an explicit API base URL with default settings.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::from_config(&StoreConfig::new(base_url)?)
    }

    /// Builds a client from validated store configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|error| {
            Error::InvalidConfiguration(format!("Failed to construct HTTP client: {error}"))
        })?;
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}/notes/{}", self.base_url, urlencoding::encode(id))
    }
}

#[async_trait]
impl NoteStore for HttpNoteStore {
    async fn list(&self, credential: &str) -> Result<Vec<Note>> {
        let credential = ensure_credential(credential)?;
        tracing::debug!("GET {}", self.notes_url());

        let response = self
            .client
            .get(self.notes_url())
            .bearer_auth(credential)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_status(response, "fetch notes").await?;

        // The remote answers `null` for a user without notes.
        let notes = response.json::<Option<Vec<Note>>>().await?;
        Ok(notes.unwrap_or_default())
    }

    async fn create(&self, note: &Note, credential: &str) -> Result<Note> {
        let credential = ensure_credential(credential)?;
        tracing::debug!("POST {} (id={})", self.notes_url(), note.id);

        let response = self
            .client
            .post(self.notes_url())
            .bearer_auth(credential)
            .header(ACCEPT, "application/json")
            .json(note)
            .send()
            .await?;
        let response = check_status(response, "create note").await?;
        let body = response.text().await?;
        Ok(parse_created_note(&body, note))
    }

    async fn delete(&self, id: &str, credential: &str) -> Result<DeleteConfirmation> {
        let credential = ensure_credential(credential)?;
        let url = self.note_url(id);
        tracing::debug!("DELETE {url}");

        let response = self
            .client
            .delete(url)
            .bearer_auth(credential)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_status(response, "delete note").await?;
        let body = response.text().await?;
        Ok(parse_confirmation(&body))
    }
}

async fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Remote {
        status: status.as_u16(),
        message: format!("Failed to {action}: {}", parse_api_error(status, &body)),
    })
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return message.trim().to_string();
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
    } else {
        trimmed
    }
}

/// Prefer the note echoed by the remote; fall back to what was sent when
/// the reply carries no note.
fn parse_created_note(body: &str, submitted: &Note) -> Note {
    if body.trim().is_empty() {
        return submitted.clone();
    }
    match serde_json::from_str::<Note>(body) {
        Ok(created) => created,
        Err(error) => {
            tracing::debug!("Create response was not a note ({error}); using submitted note");
            submitted.clone()
        }
    }
}

fn parse_confirmation(body: &str) -> DeleteConfirmation {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return DeleteConfirmation::default();
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| {
        DeleteConfirmation(serde_json::Value::String(compact_text(trimmed)))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::task::JoinHandle;

    use super::*;

    /// Serves exactly one response and hands back the raw request it saw.
    async fn spawn_one_shot_server(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let address = listener.local_addr().expect("local address");
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{address}"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let read = socket.read(&mut chunk).await.unwrap_or(0);
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn list_sends_bearer_credential_and_preserves_order() {
        let body = concat!(
            r#"[{"notesId":"123","title":"A","desc":"a"},"#,
            r#"{"notesId":"9001","title":"B","desc":"b"}]"#
        );
        let (base_url, request) = spawn_one_shot_server("200 OK", body).await;
        let store = HttpNoteStore::new(&base_url).unwrap();

        let notes = store.list("tok1").await.expect("list should succeed");
        assert_eq!(
            notes,
            vec![Note::new("123", "A", "a"), Note::new("9001", "B", "b")]
        );

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /notes http/1.1"));
        assert!(request.contains("authorization: bearer tok1"));
    }

    #[tokio::test]
    async fn list_treats_null_payload_as_empty() {
        let (base_url, _request) = spawn_one_shot_server("200 OK", "null").await;
        let store = HttpNoteStore::new(&base_url).unwrap();
        assert_eq!(store.list("tok1").await.unwrap(), Vec::<Note>::new());
    }

    #[tokio::test]
    async fn list_maps_non_success_to_remote_error() {
        let (base_url, _request) =
            spawn_one_shot_server("500 Internal Server Error", r#"{"message":"boom"}"#).await;
        let store = HttpNoteStore::new(&base_url).unwrap();

        let error = store.list("tok1").await.unwrap_err();
        match error {
            Error::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to fetch notes: boom");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn remote_error_without_body_uses_status_reason() {
        let (base_url, _request) = spawn_one_shot_server("403 Forbidden", "").await;
        let store = HttpNoteStore::new(&base_url).unwrap();

        let error = store.delete("123", "tok1").await.unwrap_err();
        assert_eq!(
            error,
            Error::Remote {
                status: 403,
                message: "Failed to delete note: Forbidden".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn blank_credential_fails_before_network() {
        // Nothing listens here; an attempted request would be a transport error.
        let store = HttpNoteStore::new("http://127.0.0.1:9").unwrap();
        assert_eq!(store.list("").await, Err(Error::Auth));
        assert_eq!(
            store.create(&Note::new("123", "A", "a"), "  ").await,
            Err(Error::Auth)
        );
        assert_eq!(store.delete("123", "").await, Err(Error::Auth));
    }

    #[tokio::test]
    async fn unreachable_remote_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let store = HttpNoteStore::new(format!("http://{address}")).unwrap();
        let error = store.list("tok1").await.unwrap_err();
        assert!(matches!(error, Error::Transport(_)), "got {error:?}");
        assert!(error.is_remote_failure());
    }

    #[tokio::test]
    async fn create_posts_wire_format_and_parses_echo() {
        let echo = r#"{"notesId":"4821","title":"Groceries","desc":"milk"}"#;
        let (base_url, request) = spawn_one_shot_server("201 Created", echo).await;
        let store = HttpNoteStore::new(&base_url).unwrap();
        let note = Note::new("4821", "Groceries", "milk");

        let created = store.create(&note, "tok1").await.unwrap();
        assert_eq!(created, note);

        let request = request.await.unwrap();
        assert!(request.to_lowercase().starts_with("post /notes http/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer tok1"));
        assert!(request.contains(r#""notesId":"4821""#));
        assert!(request.contains(r#""desc":"milk""#));
    }

    #[tokio::test]
    async fn create_falls_back_to_submitted_note_for_non_note_reply() {
        let (base_url, _request) =
            spawn_one_shot_server("200 OK", r#"{"message":"Note created"}"#).await;
        let store = HttpNoteStore::new(&base_url).unwrap();
        let note = Note::new("512", "Title", "Body");

        assert_eq!(store.create(&note, "tok1").await.unwrap(), note);
    }

    #[tokio::test]
    async fn delete_targets_encoded_note_path() {
        let (base_url, request) =
            spawn_one_shot_server("200 OK", r#"{"message":"deleted"}"#).await;
        let store = HttpNoteStore::new(&base_url).unwrap();

        let confirmation = store.delete("12 3", "tok1").await.unwrap();
        assert_eq!(
            confirmation,
            DeleteConfirmation(serde_json::json!({ "message": "deleted" }))
        );

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("delete /notes/12%203 http/1.1"));
    }

    #[test]
    fn parse_confirmation_tolerates_plain_text() {
        assert_eq!(parse_confirmation(""), DeleteConfirmation::default());
        assert_eq!(
            parse_confirmation("ok"),
            DeleteConfirmation(serde_json::Value::String("ok".to_string()))
        );
    }

    #[test]
    fn base_url_is_normalized() {
        let store = HttpNoteStore::new("https://api.example.com/dev/").unwrap();
        assert_eq!(store.base_url(), "https://api.example.com/dev");
        assert!(HttpNoteStore::new("api.example.com").is_err());
    }
}
