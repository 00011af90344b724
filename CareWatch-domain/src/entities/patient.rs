use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::reading::VitalReading;

/// Seconds without a fresh reading before the patient counts as inactive
pub const INACTIVITY_THRESHOLD_SECS: i64 = 300;

/// Identifier of the single monitored patient in the baseline snapshot
pub const BASELINE_PATIENT_ID: &str = "PAT001";

/// Derived patient condition shown on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    /// An alert is currently active
    Emergency,

    /// No alert, but the device has not synced within the staleness window
    Inactive,

    /// Fresh data and no alert
    Safe,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Emergency => "emergency",
            PatientStatus::Inactive => "inactive",
            PatientStatus::Safe => "safe",
        }
    }
}

impl std::fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Emergency contact for the monitored patient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    /// Contact name
    pub name: String,

    /// Relation to the patient, if known
    pub relation: Option<String>,

    /// Phone number to dial
    pub phone: String,
}

/// The monitored patient and the latest known vitals projection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Stable patient identifier
    pub id: String,

    /// Display name shown on the dashboard
    pub name: String,

    /// Patient age in years
    pub age: u8,

    /// Free-form medical notes
    pub medical_notes: String,

    /// Ordered emergency contacts
    pub emergency_contacts: Vec<EmergencyContact>,

    /// Paired wearable device identifier
    pub device_id: String,

    /// Latest known heart rate in beats per minute
    pub current_heart_rate: f64,

    /// Latest known blood oxygen saturation percentage
    pub current_spo2: f64,

    /// Latest known wearable battery percentage
    pub wearable_battery: f64,

    /// Observation time of the newest reading applied so far.
    /// Monotonically non-decreasing.
    pub last_sync_time: DateTime<Utc>,
}

impl Patient {
    /// Fixed baseline snapshot, restored by `reset` and used on first boot.
    pub fn baseline(now: DateTime<Utc>) -> Self {
        Self {
            id: BASELINE_PATIENT_ID.to_string(),
            name: "John Doe".to_string(),
            age: 75,
            medical_notes: "Hypertension, Diabetes Type 2, Previous fall history".to_string(),
            emergency_contacts: vec![
                EmergencyContact {
                    name: "Jane Doe".to_string(),
                    relation: Some("Daughter".to_string()),
                    phone: "+1-555-0101".to_string(),
                },
                EmergencyContact {
                    name: "Dr. Smith".to_string(),
                    relation: None,
                    phone: "+1-555-0102".to_string(),
                },
            ],
            device_id: "WearableDevice-7584".to_string(),
            current_heart_rate: 72.0,
            current_spo2: 98.0,
            wearable_battery: 87.0,
            last_sync_time: now,
        }
    }

    /// Fold a reading into the vitals projection.
    ///
    /// Arrival order is not observation order: a reading observed before
    /// `last_sync_time` must not regress the projection, so it is ignored
    /// and `false` is returned. The display name only changes when the
    /// reading carries a non-empty one.
    pub fn apply_reading(&mut self, reading: &VitalReading) -> bool {
        if reading.observed_at < self.last_sync_time {
            return false;
        }

        self.current_heart_rate = reading.heart_rate;
        self.current_spo2 = reading.spo2;
        if let Some(battery) = reading.battery {
            self.wearable_battery = battery;
        }
        if let Some(name) = reading.patient_name.as_deref() {
            if !name.trim().is_empty() {
                self.name = name.to_string();
            }
        }
        self.last_sync_time = reading.observed_at;
        true
    }

    /// Derive the dashboard status.
    ///
    /// An active alert always wins; staleness is only consulted when no
    /// alert is pending.
    pub fn status(&self, has_active_alert: bool, now: DateTime<Utc>) -> PatientStatus {
        if has_active_alert {
            return PatientStatus::Emergency;
        }
        if now - self.last_sync_time > Duration::seconds(INACTIVITY_THRESHOLD_SECS) {
            return PatientStatus::Inactive;
        }
        PatientStatus::Safe
    }

    /// Restore the baseline snapshot with a fresh sync time.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::baseline(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn reading_at(observed_at: DateTime<Utc>, heart_rate: f64) -> VitalReading {
        VitalReading {
            source_id: Uuid::new_v4(),
            observed_at,
            patient_name: None,
            heart_rate,
            spo2: 97.0,
            battery: Some(80.0),
            latitude: 40.7128,
            longitude: -74.0060,
            fall_detected: false,
        }
    }

    #[test]
    fn test_baseline_snapshot() {
        let now = Utc::now();
        let patient = Patient::baseline(now);

        assert_eq!(patient.id, "PAT001");
        assert_eq!(patient.name, "John Doe");
        assert_eq!(patient.current_heart_rate, 72.0);
        assert_eq!(patient.current_spo2, 98.0);
        assert_eq!(patient.wearable_battery, 87.0);
        assert_eq!(patient.emergency_contacts.len(), 2);
        assert_eq!(patient.last_sync_time, now);
    }

    #[test]
    fn test_apply_reading_updates_projection() {
        let start = Utc::now();
        let mut patient = Patient::baseline(start);

        let applied = patient.apply_reading(&reading_at(start + Duration::seconds(10), 88.0));
        assert!(applied);
        assert_eq!(patient.current_heart_rate, 88.0);
        assert_eq!(patient.current_spo2, 97.0);
        assert_eq!(patient.wearable_battery, 80.0);
        assert_eq!(patient.last_sync_time, start + Duration::seconds(10));
    }

    #[test]
    fn test_sync_time_is_monotonic() {
        let start = Utc::now();
        let mut patient = Patient::baseline(start);

        let t1 = start + Duration::seconds(10);
        let t2 = start + Duration::seconds(20);
        let t3 = start + Duration::seconds(30);

        // Deliver out of order: t3 first, then the older two.
        assert!(patient.apply_reading(&reading_at(t3, 90.0)));
        assert!(!patient.apply_reading(&reading_at(t1, 50.0)));
        assert!(!patient.apply_reading(&reading_at(t2, 60.0)));

        assert_eq!(patient.last_sync_time, t3);
        assert_eq!(patient.current_heart_rate, 90.0);
    }

    #[test]
    fn test_missing_battery_keeps_previous_value() {
        let start = Utc::now();
        let mut patient = Patient::baseline(start);

        let mut reading = reading_at(start + Duration::seconds(5), 75.0);
        reading.battery = None;
        patient.apply_reading(&reading);

        assert_eq!(patient.wearable_battery, 87.0);
    }

    #[test]
    fn test_empty_name_keeps_previous_name() {
        let start = Utc::now();
        let mut patient = Patient::baseline(start);

        let mut reading = reading_at(start + Duration::seconds(5), 75.0);
        reading.patient_name = Some("   ".to_string());
        patient.apply_reading(&reading);
        assert_eq!(patient.name, "John Doe");

        let mut reading = reading_at(start + Duration::seconds(6), 75.0);
        reading.patient_name = Some("Johnny Doe".to_string());
        patient.apply_reading(&reading);
        assert_eq!(patient.name, "Johnny Doe");
    }

    #[test]
    fn test_status_precedence() {
        let now = Utc::now();
        let mut patient = Patient::baseline(now);

        // Fresh sync, no alert.
        assert_eq!(patient.status(false, now), PatientStatus::Safe);

        // An active alert wins even with a fresh sync.
        assert_eq!(patient.status(true, now), PatientStatus::Emergency);

        // 301 seconds of silence without an alert.
        patient.last_sync_time = now - Duration::seconds(301);
        assert_eq!(patient.status(false, now), PatientStatus::Inactive);

        // An active alert still wins over staleness.
        assert_eq!(patient.status(true, now), PatientStatus::Emergency);

        // Exactly at the threshold is not yet inactive.
        patient.last_sync_time = now - Duration::seconds(300);
        assert_eq!(patient.status(false, now), PatientStatus::Safe);
    }

    #[test]
    fn test_reset_restores_baseline() {
        let start = Utc::now();
        let mut patient = Patient::baseline(start);
        patient.apply_reading(&reading_at(start + Duration::seconds(10), 140.0));

        let reset_time = start + Duration::seconds(60);
        patient.reset(reset_time);

        assert_eq!(patient.current_heart_rate, 72.0);
        assert_eq!(patient.current_spo2, 98.0);
        assert_eq!(patient.last_sync_time, reset_time);
    }
}
