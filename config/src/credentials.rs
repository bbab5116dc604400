//! # Credential Persistence
//!
//! Durable key/value storage for the summarization credential: a JSON map
//! in the platform configuration directory, read back on demand under a
//! fixed key. No expiry and no validation of the stored value.

use async_trait::async_trait;
use errors::CredentialError;
use pd_core::traits::CredentialStore;
use pd_core::types::ApiKey;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Fixed key the summarization credential is stored under.
pub const SUMMARIZER_API_KEY: &str = "summarizer_api_key";

/// [`CredentialStore`] over a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf
}

impl FileCredentialStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `credentials.json` in the platform config
    /// directory for this application.
    pub fn from_project_dirs() -> Result<Self, CredentialError> {
        let dirs = directories::ProjectDirs::from("", "", "paperdrive")
            .ok_or(CredentialError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join("credentials.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, CredentialError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                CredentialError::Corrupted {
                    reason: e.to_string()
                }
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(CredentialError::Io {
                reason: e.to_string()
            })
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CredentialError::Io {
                    reason: e.to_string()
                })?;
        }

        let contents = serde_json::to_string_pretty(map).map_err(|e| CredentialError::Io {
            reason: e.to_string()
        })?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| CredentialError::Io {
                reason: e.to_string()
            })
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    type Error = CredentialError;

    async fn load(&self) -> Result<Option<ApiKey>, Self::Error> {
        let map = self.read_map().await?;
        Ok(map.get(SUMMARIZER_API_KEY).map(ApiKey::new))
    }

    async fn store(&self, key: &ApiKey) -> Result<(), Self::Error> {
        let mut map = self.read_map().await?;
        map.insert(SUMMARIZER_API_KEY.to_string(), key.as_str().to_string());
        self.write_map(&map).await
    }
}
