//! # Document Store
//!
//! Authoritative in-memory state for the document sequence, the active
//! selection, and the transient extracted-text buffer.
//!
//! All mutations are synchronous functions over `&mut self`; callers apply
//! them under the write half of a shared [`tokio::sync::RwLock`], strictly
//! in event order, so there is no read-modify-write race. The store itself
//! performs no I/O and has no partial-failure semantics.

use pd_core::types::{Document, DocumentId, ExtractedText, Note, NoteId};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The shared handle orchestration layers mutate through.
pub type SharedStore = Arc<RwLock<DocumentStore>>;

/// Creates an empty store behind its shared handle.
pub fn shared() -> SharedStore {
    Arc::new(RwLock::new(DocumentStore::new()))
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    selected: Option<DocumentId>,
    extracted: Option<ExtractedText>
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the full document sequence. No merge with prior state at
    /// this layer; carry-over of local edits is the sync orchestration's
    /// concern. A selection whose id is no longer present is cleared,
    /// along with the extraction buffer.
    pub fn replace_all(&mut self, documents: Vec<Document>) {
        self.documents = documents;

        let still_present = self
            .selected
            .as_ref()
            .is_some_and(|id| self.documents.iter().any(|d| &d.id == id));
        if !still_present {
            self.selected = None;
            self.extracted = None;
        }
    }

    /// Adds one document to the end of the sequence, selects it, and
    /// clears the transient text buffer.
    pub fn append(&mut self, document: Document) {
        let id = document.id.clone();
        self.documents.push(document);
        self.selected = Some(id);
        self.extracted = None;
    }

    /// Sets the active selection. No-op when `id` is not present.
    pub fn select(&mut self, id: &DocumentId) {
        if !self.documents.iter().any(|d| &d.id == id) {
            return;
        }
        self.selected = Some(id.clone());

        // A buffer extracted for a different document is inert once the
        // selection moves on.
        if self
            .extracted
            .as_ref()
            .is_some_and(|e| &e.document_id != id)
        {
            self.extracted = None;
        }
    }

    /// Replaces `summary` on the matching document. No-op when absent;
    /// idempotent.
    pub fn set_summary(&mut self, id: &DocumentId, text: &str) {
        if let Some(doc) = self.documents.iter_mut().find(|d| &d.id == id) {
            doc.summary = text.to_string();
        }
    }

    /// Appends a note with a fresh id and current timestamps to the
    /// matching document. Returns the new note's id, or `None` when the
    /// document is absent or the trimmed content is empty.
    pub fn add_note(&mut self, id: &DocumentId, content: &str) -> Option<NoteId> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let doc = self.documents.iter_mut().find(|d| &d.id == id)?;
        let note = Note::new(content);
        let note_id = note.id.clone();
        doc.notes.push(note);
        Some(note_id)
    }

    /// Removes the matching note. No-op when the document or note is not
    /// found.
    pub fn delete_note(&mut self, id: &DocumentId, note_id: &NoteId) {
        if let Some(doc) = self.documents.iter_mut().find(|d| &d.id == id) {
            doc.notes.retain(|n| &n.id != note_id);
        }
    }

    /// Accepts an extraction result only when its tag matches the current
    /// selection; anything else is a stale report from a previous
    /// selection (or one arriving after teardown) and is ignored.
    pub fn set_extracted_text(&mut self, extracted: ExtractedText) {
        if self.selected.as_ref() == Some(&extracted.document_id) {
            self.extracted = Some(extracted);
        } else {
            tracing::debug!(
                document_id = %extracted.document_id,
                "Ignoring extraction result for non-selected document"
            );
        }
    }

    pub fn clear_extracted_text(&mut self) {
        self.extracted = None;
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn selected_id(&self) -> Option<&DocumentId> {
        self.selected.as_ref()
    }

    /// The resolved document for the current selection.
    pub fn selected(&self) -> Option<&Document> {
        let id = self.selected.as_ref()?;
        self.documents.iter().find(|d| &d.id == id)
    }

    /// Extracted text for the current selection only.
    pub fn extracted_text(&self) -> Option<&str> {
        let extracted = self.extracted.as_ref()?;
        if self.selected.as_ref() == Some(&extracted.document_id) {
            Some(&extracted.text)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
