//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use async_trait::async_trait;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the telemetry feed
    /// Returns true while the reading pump holds a live subscription
    async fn check_feed_status(&self) -> bool;

    /// Check the status of the state store
    /// Returns an error carrying the persistence notice when the last save failed
    async fn check_store_status(&self) -> Result<(), String>;
}

/// Classify the telemetry feed link
///
/// The pump has no resubscribe path, so a closed feed means readings have
/// stopped until the process restarts.
pub fn feed_component(connected: bool) -> HealthComponent {
    if connected {
        HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        }
    } else {
        HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some("Telemetry feed subscription has ended".to_string()),
        }
    }
}

/// Classify the state store from the latest persistence notice
///
/// A failing store degrades the system rather than taking it down: dashboard
/// state keeps serving from memory while saves are retried on each mutation.
pub fn store_component(notice: Option<String>) -> HealthComponent {
    match notice {
        None => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        Some(notice) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(notice),
        },
    }
}

/// Roll component statuses up into the overall system status
pub fn overall_status(components: &HashMap<String, HealthComponent>) -> SystemStatus {
    if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
        SystemStatus::Unhealthy
    } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
        SystemStatus::Degraded
    } else {
        SystemStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_feed_is_healthy() {
        let component = feed_component(true);
        assert_eq!(component.status, ComponentStatus::Healthy);
        assert!(component.details.is_none());
    }

    #[test]
    fn disconnected_feed_is_unhealthy() {
        let component = feed_component(false);
        assert_eq!(component.status, ComponentStatus::Unhealthy);
        assert!(component.details.is_some());
    }

    #[test]
    fn store_notice_degrades_the_component() {
        let healthy = store_component(None);
        assert_eq!(healthy.status, ComponentStatus::Healthy);

        let failing = store_component(Some("State persistence failing: disk full".to_string()));
        assert_eq!(failing.status, ComponentStatus::Degraded);
        assert_eq!(
            failing.details.as_deref(),
            Some("State persistence failing: disk full")
        );
    }

    #[test]
    fn overall_status_takes_the_worst_component() {
        let mut components = HashMap::new();
        components.insert("feed".to_string(), feed_component(true));
        components.insert("store".to_string(), store_component(None));
        assert_eq!(overall_status(&components), SystemStatus::Healthy);

        components.insert(
            "store".to_string(),
            store_component(Some("State persistence failing: disk full".to_string())),
        );
        assert_eq!(overall_status(&components), SystemStatus::Degraded);

        components.insert("feed".to_string(), feed_component(false));
        assert_eq!(overall_status(&components), SystemStatus::Unhealthy);
    }
}
