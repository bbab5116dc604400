//! Adapter traits for the external collaborators.
//!
//! Each adapter is an `async` trait object behind `Arc`; implementations
//! live in the `adapters` crate, in-memory mocks in `testing`.

use crate::types::{ApiKey, Document, DriveFile, ExtractedText};
use async_trait::async_trait;
use errors::DriveError;
use std::sync::Arc;

/// Lists and uploads PDF files on behalf of the signed-in user.
///
/// Both operations return records bearing at minimum `id`, `name` and a
/// viewer URL. Authentication is the [`Authenticator`]'s concern; an
/// instance of this trait is ready to use as handed out.
#[async_trait]
pub trait DriveService: Send + Sync + std::fmt::Debug {
    type Error;

    async fn list_pdfs(&self) -> Result<Vec<DriveFile>, Self::Error>;

    async fn upload_pdf(&self, name: &str, bytes: Vec<u8>) -> Result<DriveFile, Self::Error>;
}

/// A ready-to-use Drive adapter as produced by sign-in.
pub type SharedDrive = Arc<dyn DriveService<Error = DriveError>>;

/// Produces raw text for a document, tagged with the document id it was
/// extracted for.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    type Error;

    async fn extract(&self, document: &Document) -> Result<ExtractedText, Self::Error>;
}

/// Single request/response call to a hosted language-model summarization
/// endpoint. The credential is passed per call.
#[async_trait]
pub trait Summarizer: Send + Sync {
    type Error;

    async fn generate(&self, text: &str, credential: &ApiKey) -> Result<String, Self::Error>;
}

/// Durable, origin-scoped key/value persistence for the summarization
/// credential. Read on demand; no expiry or validation of the stored
/// value.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    type Error;

    async fn load(&self) -> Result<Option<ApiKey>, Self::Error>;

    async fn store(&self, key: &ApiKey) -> Result<(), Self::Error>;
}

/// Authentication collaborator. Completion of `sign_in` implies a
/// ready-to-use Drive adapter becomes available.
#[async_trait]
pub trait Authenticator: Send + Sync {
    type Error;

    async fn sign_in(&self) -> Result<SharedDrive, Self::Error>;
}
