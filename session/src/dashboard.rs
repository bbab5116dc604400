//! Signed-in intent surface.
//!
//! One dashboard per sign-in: owns the shared store and the orchestration
//! layers, and exposes the intents a UI dispatches. Every intent is a
//! store mutation or an adapter call whose result is folded back into the
//! store; adapter results that arrive after the selection moved on
//! degrade to no-op writes.

use errors::{CredentialError, DriveError, ExtractError, SummarizeError};
use pd_core::traits::{CredentialStore, SharedDrive, Summarizer, TextExtractor};
use pd_core::types::{ApiKey, Document, DocumentId, NoteId};
use std::sync::Arc;
use store::SharedStore;
use summarize::{FlowState, GenerationOutcome, SummaryFlow};
use sync::SyncManager;

pub struct Dashboard {
    store: SharedStore,
    sync: SyncManager,
    flow: SummaryFlow,
    extractor: Arc<dyn TextExtractor<Error = ExtractError>>
}

impl Dashboard {
    pub async fn new(
        drive: SharedDrive,
        summarizer: Arc<dyn Summarizer<Error = SummarizeError>>,
        extractor: Arc<dyn TextExtractor<Error = ExtractError>>,
        credentials: Arc<dyn CredentialStore<Error = CredentialError>>
    ) -> Self {
        let store = store::shared();
        let sync = SyncManager::new(drive, store.clone());
        let flow = SummaryFlow::new(summarizer, credentials, store.clone()).await;

        Self {
            store,
            sync,
            flow,
            extractor
        }
    }

    /// The shared store, for UIs that render directly from state.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.store.read().await.documents().to_vec()
    }

    pub async fn selected(&self) -> Option<Document> {
        self.store.read().await.selected().cloned()
    }

    /// Advisory; callers use it to disable the refresh/upload controls.
    pub fn is_syncing(&self) -> bool {
        self.sync.is_busy()
    }

    pub async fn refresh(&self) -> Result<usize, DriveError> {
        self.sync.sync_all().await
    }

    pub async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<DocumentId, DriveError> {
        self.sync.upload_and_select(name, bytes).await
    }

    pub async fn select(&self, id: &DocumentId) {
        self.store.write().await.select(id);
    }

    /// Runs the text extractor for the current selection and folds the
    /// tagged result into the store. Returns `Ok(false)` when nothing is
    /// selected. A failure leaves the buffer unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn extract_selected(&self) -> Result<bool, ExtractError> {
        let document = self.store.read().await.selected().cloned();
        let Some(document) = document else {
            return Ok(false);
        };

        match self.extractor.extract(&document).await {
            Ok(extracted) => {
                self.store.write().await.set_extracted_text(extracted);
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, document_id = %document.id, "Text extraction failed");
                Err(e)
            }
        }
    }

    /// Manual summary edit. No-op without a selection.
    pub async fn edit_summary(&self, text: &str) {
        let mut store = self.store.write().await;
        if let Some(id) = store.selected_id().cloned() {
            store.set_summary(&id, text);
        }
    }

    /// No-op without a selection or with blank content.
    pub async fn add_note(&self, content: &str) -> Option<NoteId> {
        let mut store = self.store.write().await;
        let id = store.selected_id().cloned()?;
        store.add_note(&id, content)
    }

    pub async fn delete_note(&self, note_id: &NoteId) {
        let mut store = self.store.write().await;
        if let Some(id) = store.selected_id().cloned() {
            store.delete_note(&id, note_id);
        }
    }

    pub async fn generate_summary(&self) -> Result<GenerationOutcome, SummarizeError> {
        self.flow.request_generation().await
    }

    pub async fn submit_credential(&self, key: ApiKey) -> Result<GenerationOutcome, SummarizeError> {
        self.flow.submit_credential(key).await
    }

    pub async fn has_credential(&self) -> bool {
        self.flow.has_credential().await
    }

    pub async fn summary_state(&self) -> FlowState {
        self.flow.state().await
    }
}
