// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use care_watch_data::store::InMemoryStateStore;

use std::collections::HashMap;
use std::io::{Error as IoError, ErrorKind};

use async_trait::async_trait;

use care_watch_data::models::PersistedState;
use care_watch_data::store::{StateStore, StoreError};

use crate::health::{
    feed_component, store_component, ComponentStatus, HealthComponent, HealthServiceTrait,
    SystemHealth, SystemStatus,
};

/// State store wrapper with configurable failures
///
/// Delegates to an in-memory store until a failure flag is set, so tests can
/// flip individual operations without losing the data already written.
#[derive(Debug, Clone, Default)]
pub struct FailingStateStore {
    inner: InMemoryStateStore,
    fail_load: bool,
    fail_save: bool,
    fail_wipe: bool,
}

impl FailingStateStore {
    /// Create a failing store that starts with every operation succeeding
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the store to fail loads
    pub fn with_load_failure(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Configure the store to fail saves
    pub fn with_save_failure(mut self) -> Self {
        self.fail_save = true;
        self
    }

    /// Configure the store to fail wipes
    pub fn with_wipe_failure(mut self) -> Self {
        self.fail_wipe = true;
        self
    }

    /// Snapshot of the inner store's document, if any
    pub fn snapshot(&self) -> Result<Option<PersistedState>, StoreError> {
        self.inner.snapshot()
    }

    fn failure(operation: &str) -> StoreError {
        StoreError::Io(IoError::new(
            ErrorKind::Other,
            format!("{} failed - mock store is configured to fail", operation),
        ))
    }
}

#[async_trait]
impl StateStore for FailingStateStore {
    async fn load(&self) -> Result<Option<PersistedState>, StoreError> {
        if self.fail_load {
            return Err(Self::failure("load"));
        }
        self.inner.load().await
    }

    async fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(Self::failure("save"));
        }
        self.inner.save(state).await
    }

    async fn wipe(&self) -> Result<(), StoreError> {
        if self.fail_wipe {
            return Err(Self::failure("wipe"));
        }
        self.inner.wipe().await
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    /// Whether the telemetry feed reports as connected
    feed_connected: bool,
    /// Persistence notice for the store component, if any
    store_notice: Option<String>,
    /// System status
    system_status: SystemStatus,
    /// Additional components
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            feed_connected: true,
            store_notice: None,
            system_status: SystemStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with a disconnected telemetry feed
    pub fn with_disconnected_feed(mut self) -> Self {
        self.feed_connected = false;
        self
    }

    /// Configure the mock with a failing state store
    pub fn with_failing_store(mut self, notice: &str) -> Self {
        self.store_notice = Some(notice.to_string());
        self
    }

    /// Set the overall system status
    pub fn with_system_status(mut self, status: SystemStatus) -> Self {
        self.system_status = status;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(
        mut self,
        name: &str,
        status: ComponentStatus,
        details: Option<String>,
    ) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    /// Get the system health
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        components.insert("feed".to_string(), feed_component(self.feed_connected));
        components.insert(
            "store".to_string(),
            store_component(self.store_notice.clone()),
        );

        // Add any additional components
        for (name, component) in &self.components {
            components.insert(name.clone(), component.clone());
        }

        SystemHealth {
            status: self.system_status.clone(),
            components,
        }
    }

    /// Check telemetry feed status
    async fn check_feed_status(&self) -> bool {
        self.feed_connected
    }

    /// Check state store status
    async fn check_store_status(&self) -> Result<(), String> {
        match &self.store_notice {
            None => Ok(()),
            Some(notice) => Err(notice.clone()),
        }
    }
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}
