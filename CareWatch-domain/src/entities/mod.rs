// Domain entities and value objects
pub mod alert;
pub mod conversions;
pub mod history;
pub mod patient;
pub mod reading;
pub mod state;

// Re-export common types for easier imports
pub use alert::{Alert, AlertStatus, ResponseAction};
pub use history::{AlertHistory, HistoryEntry, HistorySummary};
pub use patient::{EmergencyContact, Patient, PatientStatus};
pub use reading::VitalReading;
pub use state::{AlertDecision, AlertResponse, DashboardState, IngestOutcome, StaleAction};
