//! # Paperdrive Core
//!
//! Shared types and traits for the Paperdrive workspace.
//!
//! This crate provides:
//! - The document/note data model mirrored from Drive
//! - Adapter traits for the external collaborators (Drive, text
//!   extraction, summarization, authentication, credential storage)
//!
//! It performs no I/O of its own.

pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use traits::{Authenticator, CredentialStore, DriveService, SharedDrive, Summarizer, TextExtractor};
pub use types::{ApiKey, Document, DocumentId, DriveFile, ExtractedText, Note, NoteId};
