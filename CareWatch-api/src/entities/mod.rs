// Public entities for the CareWatch API
// This module contains data structures that are shared across the application boundary

// Common entities for error handling
pub mod common;

// Session entities
pub mod session;

// Re-export common types for easier imports
pub use common::ErrorResponse;
pub use session::{LoginRequest, SessionResponse, ThemeResponse};
