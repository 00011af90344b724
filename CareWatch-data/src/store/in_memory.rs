use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{StateStore, StoreError};
use crate::models::PersistedState;

/// In-memory state store for tests and ephemeral deployments
#[derive(Debug, Clone)]
pub struct InMemoryStateStore {
    /// Storage for the single persisted document
    state: Arc<Mutex<Option<PersistedState>>>,
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStateStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
        }
    }

    /// Current document without going through `load`.
    pub fn snapshot(&self) -> Result<Option<PersistedState>, StoreError> {
        let state = self
            .state
            .lock()
            .map_err(|e| StoreError::MutexLock(e.to_string()))?;
        Ok(state.clone())
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> Result<Option<PersistedState>, StoreError> {
        let state = self
            .state
            .lock()
            .map_err(|e| StoreError::MutexLock(e.to_string()))?;
        Ok(state.clone())
    }

    async fn save(&self, new_state: &PersistedState) -> Result<(), StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| StoreError::MutexLock(e.to_string()))?;
        *state = Some(new_state.clone());
        Ok(())
    }

    async fn wipe(&self) -> Result<(), StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| StoreError::MutexLock(e.to_string()))?;
        *state = None;
        Ok(())
    }
}
