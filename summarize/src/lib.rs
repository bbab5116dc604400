//! # Summarization Flow
//!
//! Produces a summary for the active document's extracted text, gated by
//! credential availability.
//!
//! Per generation attempt: `Idle` → (no text: stay `Idle`) → (no
//! credential: `AwaitingCredential`) → `Generating` → exactly one adapter
//! call → `Idle`. Failures leave the summary unchanged; nothing retries
//! automatically.
//!
//! The credential is injected configuration: loaded once from the durable
//! store when the flow is built, updated only through
//! [`SummaryFlow::submit_credential`], which also persists it under the
//! store's fixed key.

use errors::{CredentialError, SummarizeError};
use pd_core::traits::{CredentialStore, Summarizer};
use pd_core::types::ApiKey;
use std::sync::Arc;
use store::SharedStore;
use tokio::sync::RwLock;

/// Observable state of the flow between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    /// Generation was requested with text present but no credential; the
    /// presentation layer must collect one and call `submit_credential`.
    AwaitingCredential,
    /// An adapter call is in flight.
    Generating
}

/// What one `request_generation` attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// No extracted text for the current selection; nothing happened.
    NoExtractedText,
    /// Credential missing; no adapter call was made.
    AwaitingCredential,
    /// The summary was generated and written to the selected document.
    Generated
}

pub struct SummaryFlow {
    summarizer: Arc<dyn Summarizer<Error = SummarizeError>>,
    credentials: Arc<dyn CredentialStore<Error = CredentialError>>,
    store: SharedStore,
    key: RwLock<Option<ApiKey>>,
    state: RwLock<FlowState>
}

impl SummaryFlow {
    /// Builds the flow, sourcing the credential from the durable store
    /// once. A store read failure is logged and treated as "no
    /// credential".
    pub async fn new(
        summarizer: Arc<dyn Summarizer<Error = SummarizeError>>,
        credentials: Arc<dyn CredentialStore<Error = CredentialError>>,
        store: SharedStore
    ) -> Self {
        let key = match credentials.load().await {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored credential");
                None
            }
        };

        Self {
            summarizer,
            credentials,
            store,
            key: RwLock::new(key),
            state: RwLock::new(FlowState::Idle)
        }
    }

    pub async fn state(&self) -> FlowState {
        *self.state.read().await
    }

    pub async fn has_credential(&self) -> bool {
        self.key.read().await.is_some()
    }

    /// Runs one generation attempt for the current selection.
    ///
    /// The target document id and its text are captured before the
    /// adapter call; if the selection changes mid-flight the result is
    /// still written to the document it was generated for (a no-op if
    /// that document vanished in the meantime).
    #[tracing::instrument(skip(self))]
    pub async fn request_generation(&self) -> Result<GenerationOutcome, SummarizeError> {
        let captured = {
            let store = self.store.read().await;
            match (store.selected_id(), store.extracted_text()) {
                (Some(id), Some(text)) if !text.trim().is_empty() => {
                    Some((id.clone(), text.to_string()))
                }
                _ => None
            }
        };

        let Some((document_id, text)) = captured else {
            return Ok(GenerationOutcome::NoExtractedText);
        };

        let key = self.key.read().await.clone();
        let Some(key) = key else {
            *self.state.write().await = FlowState::AwaitingCredential;
            return Ok(GenerationOutcome::AwaitingCredential);
        };

        *self.state.write().await = FlowState::Generating;

        match self.summarizer.generate(&text, &key).await {
            Ok(summary) => {
                self.store
                    .write()
                    .await
                    .set_summary(&document_id, &summary);
                *self.state.write().await = FlowState::Idle;
                tracing::info!(document_id = %document_id, "Summary generated");
                Ok(GenerationOutcome::Generated)
            }
            Err(e) => {
                *self.state.write().await = FlowState::Idle;
                tracing::error!(error = %e, "Failed to generate summary");
                Err(e)
            }
        }
    }

    /// Stores the credential (durably and for the rest of the process)
    /// and re-enters the flow from the top.
    ///
    /// Persistence failures are logged and do not block generation; the
    /// in-memory credential still outlives this flow invocation.
    #[tracing::instrument(skip(self, key))]
    pub async fn submit_credential(
        &self,
        key: ApiKey
    ) -> Result<GenerationOutcome, SummarizeError> {
        if let Err(e) = self.credentials.store(&key).await {
            tracing::warn!(error = %e, "Failed to persist credential");
        }
        *self.key.write().await = Some(key);
        *self.state.write().await = FlowState::Idle;

        self.request_generation().await
    }
}
