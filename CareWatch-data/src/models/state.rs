use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted dashboard state
///
/// The whole dashboard state is stored as one JSON document under a single
/// storage key. It is rewritten as a whole after each mutation and wiped
/// entirely by "clear data". Field names are part of the stored layout and
/// must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Patient snapshot including the live vitals projection
    pub patient: PatientRecord,

    /// The active alert slot; only a pending alert is ever written here
    pub current_alert: Option<AlertRecord>,

    /// Terminal alerts, newest first
    pub alert_history: Vec<HistoryEntryRecord>,

    /// Dashboard theme flag
    pub is_dark_mode: bool,

    /// Session flag
    pub is_logged_in: bool,
}

/// Storage model for the monitored patient
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Stable patient identifier
    pub id: String,

    /// Display name shown on the dashboard
    pub name: String,

    /// Patient age in years
    pub age: u8,

    /// Free-form medical notes
    pub medical_notes: String,

    /// Ordered emergency contacts
    pub emergency_contacts: Vec<ContactRecord>,

    /// Paired wearable device identifier
    pub device_id: String,

    /// Latest known heart rate in beats per minute
    pub current_heart_rate: f64,

    /// Latest known blood oxygen saturation percentage
    pub current_spo2: f64,

    /// Latest known wearable battery percentage
    pub wearable_battery: f64,

    /// Observation time of the newest reading applied so far
    pub last_sync_time: DateTime<Utc>,
}

/// Storage model for an emergency contact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    /// Contact name
    pub name: String,

    /// Relation to the patient, if known
    pub relation: Option<String>,

    /// Phone number to dial
    pub phone: String,
}

/// Storage model for an alert in the active slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    /// Alert identifier (the triggering reading's id, or freshly generated)
    pub id: Uuid,

    /// Patient name at trigger time
    pub patient_name: String,

    /// Heart rate captured by the triggering reading
    pub heart_rate: f64,

    /// SpO2 captured by the triggering reading
    pub spo2: f64,

    /// GPS latitude at trigger time
    pub latitude: f64,

    /// GPS longitude at trigger time
    pub longitude: f64,

    /// When the alert was raised
    pub timestamp: DateTime<Utc>,

    /// Lifecycle status string ("pending", "accepted", "declined", "resolved")
    pub status: String,

    /// Caretaker response action, once one was taken
    pub response_action: Option<String>,
}

/// Storage model for an archived alert outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryRecord {
    /// Id of the archived alert
    pub id: Uuid,

    /// Calendar date of the alert, YYYY-MM-DD
    pub date: String,

    /// Wall-clock time of the alert, HH:MM:SS
    pub time: String,

    /// Formatted coordinate pair
    pub location: String,

    /// Heart rate at trigger time
    pub heart_rate: f64,

    /// SpO2 at trigger time
    pub spo2: f64,

    /// Terminal status the alert ended in
    pub response_status: String,
}
