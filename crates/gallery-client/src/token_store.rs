use async_trait::async_trait;
use gallery_api::{GalleryError, Result};
use gallery_core::TokenStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps the login token in a single file between runs
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, action: &str, e: std::io::Error) -> GalleryError {
        GalleryError::Storage {
            message: format!("Failed to {} token file {}: {}", action, self.path.display(), e),
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load_token(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.storage_error("read", e)),
        }
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.storage_error("create directory for", e))?;
        }
        tokio::fs::write(&self.path, token)
            .await
            .map_err(|e| self.storage_error("write", e))?;
        debug!("[FileTokenStore] Token saved to {}", self.path.display());
        Ok(())
    }

    async fn clear_token(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.storage_error("remove", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.load_token().await.unwrap(), None);
        store.save_token("abc.def").await.unwrap();
        assert_eq!(store.load_token().await.unwrap().as_deref(), Some("abc.def"));

        store.clear_token().await.unwrap();
        assert_eq!(store.load_token().await.unwrap(), None);
        // Clearing twice is fine
        store.clear_token().await.unwrap();
    }
}
