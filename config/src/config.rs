//! # Configuration Structures
//!
//! All configuration structures use `serde` for (de)serialization and
//! `validator` for input validation. Every field has a default so a bare
//! config file (or none at all) still produces a usable configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level configuration aggregating all adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct AppConfig {
    /// Google Drive adapter endpoints
    #[serde(default)]
    #[validate(nested)]
    pub drive: DriveConfig,

    /// Summarization adapter endpoint and model
    #[serde(default)]
    #[validate(nested)]
    pub summarizer: SummarizerConfig,

    /// OAuth sign-in settings
    #[serde(default)]
    #[validate(nested)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig
}

/// Google Drive REST endpoints. Overridable so tests can point the
/// adapter at a local mock server.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DriveConfig {
    #[validate(length(min = 1))]
    pub base_url: String,

    #[validate(length(min = 1))]
    pub upload_base_url: String
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base_url: "https://www.googleapis.com/upload/drive/v3".to_string()
        }
    }
}

/// Hosted language-model summarization endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct SummarizerConfig {
    #[validate(length(min = 1))]
    pub base_url: String,

    #[validate(length(min = 1))]
    pub model: String
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string()
        }
    }
}

/// OAuth installed-app flow settings.
///
/// The client id/secret identify this application to Google; they are not
/// user credentials and are safe to ship in a config file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct AuthConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Fixed loopback port for the redirect listener. `None` lets the OS
    /// pick a free port.
    #[serde(default)]
    pub redirect_port: Option<u16>
}

/// Logging configuration consumed by the embedding application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    pub logging_level: String
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging_level: "info".to_string()
        }
    }
}
