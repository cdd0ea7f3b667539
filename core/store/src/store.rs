//! Document store trait definition.

use async_trait::async_trait;

use wealthsense_common::{Result, UserId};

/// Persistence collaborator for per-user tracking documents.
///
/// Implementations are the system of record; the core hands them
/// already-encrypted field values and receives them back unchanged.
/// A remote document database, a local file, or an in-memory map are all
/// valid backends.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get the store name (e.g., "memory", "local").
    fn name(&self) -> &str;

    /// Load a user's tracking document.
    ///
    /// # Postconditions
    /// - Returns `Ok(None)` if the user has no document yet; callers decide
    ///   whether to create a default
    ///
    /// # Errors
    /// - I/O or backend failure
    async fn load(&self, user: &UserId) -> Result<Option<Vec<u8>>>;

    /// Save a user's tracking document, replacing any previous version.
    ///
    /// # Postconditions
    /// - A subsequent `load` for the same user returns exactly `data`
    ///
    /// # Errors
    /// - I/O or backend failure
    async fn save(&self, user: &UserId, data: Vec<u8>) -> Result<()>;
}
