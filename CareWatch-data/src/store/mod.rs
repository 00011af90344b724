// Store module structure
pub mod errors;
mod file;
mod in_memory;

// Re-export commonly used types
pub use errors::StoreError;
pub use file::{FileStateStore, STORE_FILE_NAME};
pub use in_memory::InMemoryStateStore;

use async_trait::async_trait;

use crate::models::PersistedState;

/// Persistence boundary for the dashboard-state blob
///
/// The whole state travels as one document: there are no partial updates,
/// and `wipe` removes the document entirely.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted document. `None` on first boot or after a wipe.
    async fn load(&self) -> Result<Option<PersistedState>, StoreError>;

    /// Replace the persisted document.
    async fn save(&self, state: &PersistedState) -> Result<(), StoreError>;

    /// Remove the persisted document entirely.
    async fn wipe(&self) -> Result<(), StoreError>;
}
