//! # Sync Orchestration
//!
//! Coordinates calls to the Drive adapter and folds results into the
//! document store. On any adapter failure the store is left untouched,
//! the failure is logged, and the error is returned to the caller.

use errors::DriveError;
use pd_core::traits::{DriveService, SharedDrive};
use pd_core::types::{Document, DocumentId, DriveFile};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use store::SharedStore;

/// Leading bytes every PDF payload starts with.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Orchestrates Drive listing/upload against the shared store.
pub struct SyncManager {
    drive: SharedDrive,
    store: SharedStore,
    busy: Arc<AtomicBool>
}

impl SyncManager {
    pub fn new(drive: SharedDrive, store: SharedStore) -> Self {
        Self {
            drive,
            store,
            busy: Arc::new(AtomicBool::new(false))
        }
    }

    /// Advisory busy flag for callers to disable re-entrant triggering.
    /// Not enforced: two concurrent `sync_all` calls both run; last
    /// writer wins.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Lists the user's PDFs and replaces the store's document sequence.
    ///
    /// Fresh records keep the local `summary` and `notes` of a document
    /// that is already tracked under the same id; ids absent from the
    /// fresh listing are dropped. Returns the number of documents after
    /// the sync.
    #[tracing::instrument(skip(self))]
    pub async fn sync_all(&self) -> Result<usize, DriveError> {
        let _guard = BusyGuard::hold(&self.busy);

        let files = match self.drive.list_pdfs().await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(error = %e, "Failed to sync with Drive");
                return Err(e);
            }
        };

        let mut store = self.store.write().await;
        let merged = merge_by_id(store.documents(), files);
        let count = merged.len();
        store.replace_all(merged);

        tracing::info!(documents = count, "Drive sync complete");
        Ok(count)
    }

    /// Uploads one PDF and appends the resulting document to the store,
    /// which also selects it and clears the extraction buffer.
    ///
    /// Non-PDF payloads are rejected before any network call.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_and_select(
        &self,
        name: &str,
        bytes: Vec<u8>
    ) -> Result<DocumentId, DriveError> {
        if !is_pdf(&bytes) {
            let err = DriveError::NotPdf {
                name: name.to_string()
            };
            tracing::warn!(name, "Rejected upload of non-PDF payload");
            return Err(err);
        }

        let _guard = BusyGuard::hold(&self.busy);

        let file = match self.drive.upload_pdf(name, bytes).await {
            Ok(file) => file,
            Err(e) => {
                tracing::error!(error = %e, "Failed to upload file");
                return Err(e);
            }
        };

        let document = Document::from_drive_file(file);
        let id = document.id.clone();
        self.store.write().await.append(document);

        tracing::info!(document_id = %id, "Uploaded and selected");
        Ok(id)
    }
}

/// Maps external records into documents, carrying over local summary and
/// notes for ids that survived the sync.
fn merge_by_id(current: &[Document], files: Vec<DriveFile>) -> Vec<Document> {
    files
        .into_iter()
        .map(|file| {
            let mut doc = Document::from_drive_file(file);
            if let Some(existing) = current.iter().find(|d| d.id == doc.id) {
                doc.summary = existing.summary.clone();
                doc.notes = existing.notes.clone();
            }
            doc
        })
        .collect()
}

fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Holds the advisory busy flag for the duration of one operation.
struct BusyGuard<'a> {
    flag: &'a AtomicBool
}

impl<'a> BusyGuard<'a> {
    fn hold(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
