//! # Configuration System
//!
//! Centralized configuration for the Paperdrive workspace.
//!
//! This crate provides:
//! - Configuration structures for the Drive, summarization and auth
//!   adapters
//! - Environment variable loading (12-factor app principles)
//! - Configuration file loading (TOML/YAML)
//! - Durable credential persistence under a fixed key

pub mod config;
pub mod credentials;
pub mod file_loader;
pub mod loader;

pub use config::{AppConfig, AuthConfig, DriveConfig, ObservabilityConfig, SummarizerConfig};
pub use credentials::{FileCredentialStore, SUMMARIZER_API_KEY};
pub use file_loader::{load_from_file, load_from_toml, load_from_yaml};
pub use loader::load_from_env;
pub use validator::Validate;
