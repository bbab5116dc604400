use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque stable identifier assigned to a document by the Drive adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locally generated note identifier, unique within the owning document's
/// note sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-authored annotation attached to a document.
///
/// `updated_at` is set at creation and never touched afterwards; there is
/// no note-edit operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl Note {
    /// Creates a note with a fresh id and current timestamps. Content is
    /// expected to be non-empty; the store validates before calling this.
    pub fn new(content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::generate(),
            content: content.into(),
            created_at: now,
            updated_at: now
        }
    }
}

/// A PDF file tracked by the system, mirrored from Drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    /// Dereferenceable link used by the text extractor and for preview.
    pub url: String,
    /// Mutable text, edited by the user or overwritten by a generated
    /// summary.
    pub summary: String,
    /// Insertion-ordered, owned exclusively by this document.
    pub notes: Vec<Note>
}

impl Document {
    /// Maps a validated external record into a fresh document with empty
    /// summary and notes.
    pub fn from_drive_file(file: DriveFile) -> Self {
        Self {
            id: DocumentId::new(file.id),
            name: file.name,
            url: file.web_view_link,
            summary: String::new(),
            notes: Vec::new()
        }
    }
}

/// Validated record returned by the Drive adapter.
///
/// Deserialized with an explicit schema at the adapter boundary; records
/// missing `id`, `name` or `webViewLink` never make it past the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub web_view_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>
}

/// Text extracted from a document, tagged with the document it was
/// extracted for. The store ignores results whose tag does not match the
/// current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub document_id: DocumentId,
    pub text: String
}

impl ExtractedText {
    pub fn new(document_id: DocumentId, text: impl Into<String>) -> Self {
        Self {
            document_id,
            text: text.into()
        }
    }
}

/// The credential required by the summarization adapter.
///
/// `Debug` is redacted so the key never leaks through logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_ids_are_unique() {
        let a = Note::new("first");
        let b = Note::new("second");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn note_timestamps_set_at_creation() {
        let note = Note::new("hello");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn document_from_drive_file_starts_empty() {
        let file = DriveFile {
            id: "f1".to_string(),
            name: "A.pdf".to_string(),
            web_view_link: "https://drive.example/f1".to_string(),
            mime_type: Some("application/pdf".to_string())
        };

        let doc = Document::from_drive_file(file);
        assert_eq!(doc.id.as_str(), "f1");
        assert_eq!(doc.name, "A.pdf");
        assert_eq!(doc.url, "https://drive.example/f1");
        assert!(doc.summary.is_empty());
        assert!(doc.notes.is_empty());
    }

    #[test]
    fn drive_file_camel_case_schema() {
        let json = r#"{"id":"f1","name":"A.pdf","webViewLink":"u1","mimeType":"application/pdf"}"#;
        let file: DriveFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.web_view_link, "u1");
        assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-secret");
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
    }
}
