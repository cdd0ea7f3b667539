//! In-memory document store for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::store::DocumentStore;
use wealthsense_common::{Result, UserId};

/// In-memory document store.
///
/// Useful for testing and development. All documents are stored in memory
/// and lost on drop.
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, user: &UserId) -> Result<Option<Vec<u8>>> {
        let documents = self.documents.read().unwrap();
        Ok(documents.get(user.as_str()).cloned())
    }

    async fn save(&self, user: &UserId, data: Vec<u8>) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        documents.insert(user.as_str().to_string(), data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let store = MemoryStore::new();
        let user = UserId::new("u1").unwrap();

        assert!(store.load(&user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemoryStore::new();
        let user = UserId::new("u1").unwrap();

        store.save(&user, b"doc-v1".to_vec()).await.unwrap();
        assert_eq!(store.load(&user).await.unwrap().unwrap(), b"doc-v1");

        // Save replaces the previous version
        store.save(&user, b"doc-v2".to_vec()).await.unwrap();
        assert_eq!(store.load(&user).await.unwrap().unwrap(), b"doc-v2");
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = MemoryStore::new();
        let a = UserId::new("a").unwrap();
        let b = UserId::new("b").unwrap();

        store.save(&a, b"a-doc".to_vec()).await.unwrap();

        assert!(store.load(&b).await.unwrap().is_none());
    }
}
