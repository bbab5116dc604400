use async_trait::async_trait;
use errors::{AuthError, CredentialError, DriveError, ExtractError, SummarizeError};
use pd_core::traits::{
    Authenticator, CredentialStore, DriveService, SharedDrive, Summarizer, TextExtractor
};
use pd_core::types::{ApiKey, Document, DriveFile, ExtractedText};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Builds a well-formed Drive record for tests.
pub fn drive_file(id: &str, name: &str, url: &str) -> DriveFile {
    DriveFile {
        id: id.to_string(),
        name: name.to_string(),
        web_view_link: url.to_string(),
        mime_type: Some("application/pdf".to_string())
    }
}

/// Minimal valid PDF payload for upload guards.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n%%EOF\n".to_vec()
}

/// In-memory Drive adapter with call counters and switchable failures.
#[derive(Debug)]
pub struct MockDriveService {
    files: RwLock<Vec<DriveFile>>,
    pub list_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    fail_listing: AtomicBool,
    fail_upload: AtomicBool
}

impl MockDriveService {
    pub fn new(files: Vec<DriveFile>) -> Self {
        Self {
            files: RwLock::new(files),
            list_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            fail_listing: AtomicBool::new(false),
            fail_upload: AtomicBool::new(false)
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub async fn set_files(&self, files: Vec<DriveFile>) {
        *self.files.write().await = files;
    }

    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upload(&self, fail: bool) {
        self.fail_upload.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DriveService for MockDriveService {
    type Error = DriveError;

    async fn list_pdfs(&self) -> Result<Vec<DriveFile>, Self::Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(DriveError::Api {
                status: 500,
                body: "listing unavailable".to_string()
            });
        }
        Ok(self.files.read().await.clone())
    }

    async fn upload_pdf(&self, name: &str, _bytes: Vec<u8>) -> Result<DriveFile, Self::Error> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(DriveError::Api {
                status: 500,
                body: "upload unavailable".to_string()
            });
        }

        let n = self.files.read().await.len();
        let file = drive_file(
            &format!("uploaded-{}", n),
            name,
            &format!("https://drive.example/uploaded-{}", n)
        );
        self.files.write().await.push(file.clone());
        Ok(file)
    }
}

/// Summarizer recording every `(text, credential)` pair it was called
/// with.
pub struct MockSummarizer {
    response: RwLock<String>,
    pub calls: RwLock<Vec<(String, String)>>,
    fail: AtomicBool
}

impl MockSummarizer {
    pub fn new(response: &str) -> Self {
        Self {
            response: RwLock::new(response.to_string()),
            calls: RwLock::new(Vec::new()),
            fail: AtomicBool::new(false)
        }
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn set_response(&self, response: &str) {
        *self.response.write().await = response.to_string();
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    type Error = SummarizeError;

    async fn generate(&self, text: &str, credential: &ApiKey) -> Result<String, Self::Error> {
        self.calls
            .write()
            .await
            .push((text.to_string(), credential.as_str().to_string()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(SummarizeError::Api {
                status: 500,
                body: "summarization unavailable".to_string()
            });
        }
        Ok(self.response.read().await.clone())
    }
}

/// Extractor resolving text by document id.
pub struct MockExtractor {
    texts: RwLock<HashMap<String, String>>,
    fail: AtomicBool
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            texts: RwLock::new(HashMap::new()),
            fail: AtomicBool::new(false)
        }
    }

    pub async fn set_text(&self, document_id: &str, text: &str) {
        self.texts
            .write()
            .await
            .insert(document_id.to_string(), text.to_string());
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    type Error = ExtractError;

    async fn extract(&self, document: &Document) -> Result<ExtractedText, Self::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ExtractError::Fetch {
                reason: "content unavailable".to_string()
            });
        }

        let texts = self.texts.read().await;
        let text = texts
            .get(document.id.as_str())
            .cloned()
            .unwrap_or_else(|| format!("text of {}", document.name));
        Ok(ExtractedText::new(document.id.clone(), text))
    }
}

/// In-memory credential store.
pub struct MemoryCredentialStore {
    key: RwLock<Option<ApiKey>>,
    fail: AtomicBool
}

impl MemoryCredentialStore {
    pub fn empty() -> Self {
        Self {
            key: RwLock::new(None),
            fail: AtomicBool::new(false)
        }
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            key: RwLock::new(Some(ApiKey::new(key))),
            fail: AtomicBool::new(false)
        }
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    type Error = CredentialError;

    async fn load(&self) -> Result<Option<ApiKey>, Self::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CredentialError::Io {
                reason: "store unavailable".to_string()
            });
        }
        Ok(self.key.read().await.clone())
    }

    async fn store(&self, key: &ApiKey) -> Result<(), Self::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CredentialError::Io {
                reason: "store unavailable".to_string()
            });
        }
        *self.key.write().await = Some(key.clone());
        Ok(())
    }
}

/// Authenticator handing out a prepared Drive adapter, or failing with a
/// configured error.
pub struct MockAuthenticator {
    drive: RwLock<Option<SharedDrive>>,
    error: RwLock<Option<fn() -> AuthError>>,
    pub sign_in_calls: AtomicUsize
}

impl MockAuthenticator {
    pub fn with_drive(drive: SharedDrive) -> Self {
        Self {
            drive: RwLock::new(Some(drive)),
            error: RwLock::new(None),
            sign_in_calls: AtomicUsize::new(0)
        }
    }

    pub fn failing(error: fn() -> AuthError) -> Self {
        Self {
            drive: RwLock::new(None),
            error: RwLock::new(Some(error)),
            sign_in_calls: AtomicUsize::new(0)
        }
    }

    pub async fn succeed_with(&self, drive: SharedDrive) {
        *self.drive.write().await = Some(drive);
        *self.error.write().await = None;
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    type Error = AuthError;

    async fn sign_in(&self) -> Result<SharedDrive, Self::Error> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = *self.error.read().await {
            return Err(error());
        }
        Ok(Arc::clone(self.drive.read().await.as_ref().expect(
            "MockAuthenticator configured without drive or error"
        )))
    }
}
