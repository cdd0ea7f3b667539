//! Local filesystem document store.
//!
//! Stores each user's tracking document as a single JSON file under a root
//! directory. Intended for desktop/offline use; the remote document
//! database used in production implements the same trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::store::DocumentStore;
use wealthsense_common::{Error, Result, UserId};

/// Local filesystem document store.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a new local store rooted at the given directory.
    ///
    /// # Postconditions
    /// - Root directory is created if it doesn't exist
    ///
    /// # Errors
    /// - Invalid path
    /// - Permission denied
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        // Create root if it doesn't exist (sync for constructor)
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }

        Ok(Self { root })
    }

    /// Filesystem path of a user's document file.
    ///
    /// User ids become file names, so ids with path separators are refused.
    fn document_path(&self, user: &UserId) -> Result<PathBuf> {
        let id = user.as_str();
        if id.contains('/') || id.contains('\\') || id.contains("..") {
            return Err(Error::InvalidInput(
                "UserId cannot contain path separators".to_string(),
            ));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn load(&self, user: &UserId) -> Result<Option<Vec<u8>>> {
        let path = self.document_path(user)?;

        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, user: &UserId, data: Vec<u8>) -> Result<()> {
        let path = self.document_path(user)?;

        debug!(user = %user, size = data.len(), "Saving tracking document");
        fs::write(&path, data).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        let user = UserId::new("u1").unwrap();

        assert!(store.load(&user).await.unwrap().is_none());

        store.save(&user, b"{\"v\":1}".to_vec()).await.unwrap();
        assert_eq!(store.load(&user).await.unwrap().unwrap(), b"{\"v\":1}");
    }

    #[tokio::test]
    async fn test_creates_root_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("tracking");

        let store = LocalStore::new(&nested).unwrap();
        assert_eq!(store.name(), "local");
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn test_rejects_path_separators() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        let user = UserId::new("../escape").unwrap();

        assert!(store.load(&user).await.is_err());
    }
}
