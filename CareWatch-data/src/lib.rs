// CareWatch data layer
// This crate handles telemetry transport and dashboard-state persistence

// Realtime vitals feed (subscription and query access)
pub mod feed;

// Persistent dashboard-state storage
pub mod store;

// Wire and storage models
pub mod models;
