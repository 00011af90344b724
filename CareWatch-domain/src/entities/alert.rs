use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::reading::VitalReading;

/// Lifecycle status of an alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Raised and awaiting a caretaker response
    Pending,

    /// Caretaker accepted and is responding
    Accepted,

    /// Caretaker declined; handling was escalated
    Declined,

    /// Closed without a recorded response
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Accepted => "accepted",
            AlertStatus::Declined => "declined",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AlertStatus::Pending),
            "accepted" => Ok(AlertStatus::Accepted),
            "declined" => Ok(AlertStatus::Declined),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(format!("Unknown alert status: {}", other)),
        }
    }
}

/// Action the caretaker took in response to an alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseAction {
    /// Caretaker is responding in person
    Responded,

    /// Declined and escalated to the emergency contacts
    Escalated,

    /// An ambulance was dispatched
    AmbulanceCalled,
}

impl ResponseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseAction::Responded => "RESPONDED",
            ResponseAction::Escalated => "ESCALATED",
            ResponseAction::AmbulanceCalled => "AMBULANCE_CALLED",
        }
    }
}

impl std::fmt::Display for ResponseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResponseAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RESPONDED" => Ok(ResponseAction::Responded),
            "ESCALATED" => Ok(ResponseAction::Escalated),
            "AMBULANCE_CALLED" => Ok(ResponseAction::AmbulanceCalled),
            other => Err(format!("Unknown response action: {}", other)),
        }
    }
}

/// A raised emergency alert occupying the active slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Alert identifier; the triggering reading's id, or freshly generated
    /// for a manual trigger
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

    /// When the alert was raised; serialized as `timestamp`, the name the
    /// dashboard clients expect
    #[serde(rename = "timestamp")]
    pub triggered_at: DateTime<Utc>,

    /// Lifecycle status
    pub status: AlertStatus,

    /// Caretaker response action, once one was taken
    pub response_action: Option<ResponseAction>,
}

impl Alert {
    /// Alert raised by a fall-flagged reading.
    ///
    /// Keeps the reading's id so feed events and archived alerts correlate.
    /// The patient name comes from the dashboard state, not the reading.
    pub fn from_reading(reading: &VitalReading, patient_name: &str) -> Self {
        Self {
            id: reading.source_id,
            patient_name: patient_name.to_string(),
            heart_rate: reading.heart_rate,
            spo2: reading.spo2,
            latitude: reading.latitude,
            longitude: reading.longitude,
            triggered_at: reading.observed_at,
            status: AlertStatus::Pending,
            response_action: None,
        }
    }

    /// Operator-initiated test alert with plausible synthetic vitals around
    /// the demo location.
    pub fn test_alert(patient_name: &str, now: DateTime<Utc>) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            id: Uuid::new_v4(),
            patient_name: patient_name.to_string(),
            heart_rate: (92.0 + rng.gen::<f64>() * 20.0).floor(),
            spo2: (95.0 + rng.gen::<f64>() * 4.0).floor(),
            latitude: 40.7128 + (rng.gen::<f64>() - 0.5) * 0.01,
            longitude: -74.0060 + (rng.gen::<f64>() - 0.5) * 0.01,
            triggered_at: now,
            status: AlertStatus::Pending,
            response_action: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == AlertStatus::Pending
    }
}
