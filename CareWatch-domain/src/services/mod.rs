pub mod dashboard;
pub mod vitals;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use dashboard::{
    create_dashboard_service, DashboardService, DashboardServiceError, DashboardServiceTrait,
};
pub use vitals::{battery_zone, heart_rate_zone, spo2_zone, VitalZone};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use dashboard::create_mock_dashboard_service;
