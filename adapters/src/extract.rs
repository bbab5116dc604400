//! PDF text extraction.
//!
//! Fetches the document content from its viewer URL and extracts text
//! locally, page by page in page order. The result is tagged with the
//! document id it was extracted for, so a report that arrives after the
//! selection moved on is ignored by the store.

use async_trait::async_trait;
use errors::ExtractError;
use pd_core::traits::TextExtractor;
use pd_core::types::{Document, ExtractedText};

pub struct PdfExtractor {
    client: reqwest::Client
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new()
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch(e: reqwest::Error) -> ExtractError {
    ExtractError::Fetch {
        reason: e.to_string()
    }
}

/// Parses the PDF and concatenates per-page text in page order.
pub fn extract_text(bytes: &[u8], name: &str) -> Result<String, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Parse {
        reason: e.to_string()
    })?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(ExtractError::Encrypted {
            name: name.to_string()
        });
    }

    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages).map_err(|e| ExtractError::Parse {
        reason: e.to_string()
    })
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    type Error = ExtractError;

    #[tracing::instrument(skip(self, document), fields(document_id = %document.id))]
    async fn extract(&self, document: &Document) -> Result<ExtractedText, Self::Error> {
        let response = self
            .client
            .get(&document.url)
            .send()
            .await
            .map_err(fetch)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Fetch {
                reason: format!("status {}", status.as_u16())
            });
        }

        let bytes = response.bytes().await.map_err(fetch)?;
        let name = document.name.clone();

        // Parsing is CPU-bound; keep it off the async workers.
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes, &name))
            .await
            .map_err(|e| ExtractError::Parse {
                reason: e.to_string()
            })??;

        Ok(ExtractedText::new(document.id.clone(), text))
    }
}
