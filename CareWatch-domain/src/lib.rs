// CareWatch Domain
// This crate contains the business logic for the CareWatch dashboard

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Feed ingestion pump
pub mod ingest;

// Health checks and system status
pub mod health;

// Re-export the feed and store modules from care_watch_data for convenience
pub use care_watch_data::feed;
pub use care_watch_data::store;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
