//! # Paperdrive Errors
//!
//! Error taxonomy shared across the workspace.
//!
//! Every adapter failure is caught at its orchestration call site, logged,
//! and surfaced as a state-unchanged outcome. There is no global error
//! channel and no automatic retry.

use thiserror::Error;

/// Sign-in failures surfaced by the authentication collaborator.
///
/// `Clone` so the presentation layer can keep the last failure around
/// for display.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The browser window for the consent screen could not be opened.
    #[error("Sign-in window was blocked: {reason}")]
    PopupBlocked { reason: String },

    #[error("Sign-in failed: {reason}")]
    Failed { reason: String }
}

impl AuthError {
    /// Remediation text shown to the user alongside the error. Only the
    /// blocked-window case has concrete steps; everything else is retried
    /// as-is.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            AuthError::PopupBlocked { .. } => Some(
                "The sign-in window was blocked. Allow pop-ups for this \
                 application in your browser settings, then click the \
                 sign-in button again."
            ),
            AuthError::Failed { .. } => None
        }
    }
}

/// Google Drive adapter errors (listing and uploads).
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Drive API error: status {status}: {body}")]
    Api { status: u16, body: String },

    /// An external record was missing one of the required fields
    /// (`id`, `name`, `webViewLink`).
    #[error("Invalid file record: {reason}")]
    InvalidRecord { reason: String },

    /// Rejected before any network call: the payload is not a PDF.
    #[error("Not a PDF file: {name}")]
    NotPdf { name: String }
}

/// Text extraction errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to fetch document content: {reason}")]
    Fetch { reason: String },

    #[error("Failed to parse PDF: {reason}")]
    Parse { reason: String },

    #[error("Document is encrypted: {name}")]
    Encrypted { name: String }
}

/// Summarization adapter errors.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Summarization API error: status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Summarization API returned no content")]
    EmptyResponse
}

/// Durable credential store errors.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Credential store I/O error: {reason}")]
    Io { reason: String },

    #[error("Credential store is corrupted: {reason}")]
    Corrupted { reason: String },

    #[error("No configuration directory available on this platform")]
    NoConfigDir
}
