// Model module structure
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use state::{AlertRecord, ContactRecord, HistoryEntryRecord, PatientRecord, PersistedState};
pub use telemetry::VitalReadingRecord;
