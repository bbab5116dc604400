//! # External Collaborator Adapters
//!
//! Concrete implementations of the `pd_core` adapter traits:
//!
//! - [`GoogleDriveClient`] — Drive v3 REST (listing and multipart upload)
//! - [`OpenAiSummarizer`] — hosted chat-completions summarization
//! - [`PdfExtractor`] — fetch + local PDF text extraction
//! - [`GoogleAuthenticator`] — OAuth installed-app sign-in flow
//!
//! All protocol concerns live here; the rest of the workspace only sees
//! the traits.

pub mod auth;
pub mod drive;
pub mod extract;
pub mod openai;

pub use auth::GoogleAuthenticator;
pub use drive::GoogleDriveClient;
pub use extract::PdfExtractor;
pub use openai::OpenAiSummarizer;
