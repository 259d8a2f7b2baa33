//! File-based credentials provider adapter.
//!
//! Wraps [`CredentialsManager`] and implements [`CredentialsProvider`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::auth::credentials::{Credentials, CredentialsManager};
use crate::traits::{CredentialsError, CredentialsProvider};

/// File-based credentials provider.
///
/// Tokens are stored at the path given, by default
/// `~/.sigmalite/.credentials.json` as resolved by the config layer.
#[derive(Debug, Clone)]
pub struct FileCredentialsProvider {
    manager: CredentialsManager,
}

impl FileCredentialsProvider {
    /// Provider for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            manager: CredentialsManager::with_path(path),
        }
    }

    pub fn credentials_path(&self) -> &Path {
        self.manager.credentials_path()
    }
}

#[async_trait]
impl CredentialsProvider for FileCredentialsProvider {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        let creds = self
            .manager
            .load()
            .map_err(|e| CredentialsError::LoadFailed(e.to_string()))?;

        if creds.is_empty() {
            Ok(None)
        } else {
            Ok(Some(creds))
        }
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        self.manager
            .save(creds)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        self.manager
            .clear()
            .map_err(|e| CredentialsError::ClearFailed(e.to_string()))
    }
}
