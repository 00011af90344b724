use crate::entities::alert::Alert;
use crate::entities::history::{AlertHistory, HistoryEntry};
use crate::entities::patient::{EmergencyContact, Patient};
use crate::entities::reading::VitalReading;
use crate::entities::state::DashboardState;

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]
/// as specified in the architectural rules

/// Convert from data model to domain entity for a wearable reading
pub fn convert_to_domain_reading(record: care_watch_data::models::VitalReadingRecord)
    -> VitalReading
{
    VitalReading {
        source_id: record.id,
        observed_at: record.created_at,
        patient_name: record.patient_name,
        heart_rate: record.heart_rate,
        spo2: record.spo2,
        battery: record.battery,
        latitude: record.latitude,
        longitude: record.longitude,
        fall_detected: record.fall_detected,
    }
}

/// Convert from domain entity to data model for the patient snapshot
pub fn convert_to_data_patient(patient: &Patient) -> care_watch_data::models::PatientRecord {
    care_watch_data::models::PatientRecord {
        id: patient.id.clone(),
        name: patient.name.clone(),
        age: patient.age,
        medical_notes: patient.medical_notes.clone(),
        emergency_contacts: patient
            .emergency_contacts
            .iter()
            .map(|contact| care_watch_data::models::ContactRecord {
                name: contact.name.clone(),
                relation: contact.relation.clone(),
                phone: contact.phone.clone(),
            })
            .collect(),
        device_id: patient.device_id.clone(),
        current_heart_rate: patient.current_heart_rate,
        current_spo2: patient.current_spo2,
        wearable_battery: patient.wearable_battery,
        last_sync_time: patient.last_sync_time,
    }
}

/// Convert from data model to domain entity for the patient snapshot
pub fn convert_to_domain_patient(record: care_watch_data::models::PatientRecord) -> Patient {
    Patient {
        id: record.id,
        name: record.name,
        age: record.age,
        medical_notes: record.medical_notes,
        emergency_contacts: record
            .emergency_contacts
            .into_iter()
            .map(|contact| EmergencyContact {
                name: contact.name,
                relation: contact.relation,
                phone: contact.phone,
            })
            .collect(),
        device_id: record.device_id,
        current_heart_rate: record.current_heart_rate,
        current_spo2: record.current_spo2,
        wearable_battery: record.wearable_battery,
        last_sync_time: record.last_sync_time,
    }
}

/// Convert from domain entity to data model for an alert
pub fn convert_to_data_alert(alert: &Alert) -> care_watch_data::models::AlertRecord {
    care_watch_data::models::AlertRecord {
        id: alert.id,
        patient_name: alert.patient_name.clone(),
        heart_rate: alert.heart_rate,
        spo2: alert.spo2,
        latitude: alert.latitude,
        longitude: alert.longitude,
        timestamp: alert.triggered_at,
        status: alert.status.to_string(),
        response_action: alert.response_action.map(|action| action.to_string()),
    }
}

/// Convert from data model to domain entity for an alert
///
/// An unknown status string fails the whole conversion, while an unknown
/// response action is dropped: the status drives the state machine, the
/// action is descriptive only.
pub fn convert_to_domain_alert(record: care_watch_data::models::AlertRecord)
    -> Result<Alert, String>
{
    let status = record.status.parse()?;
    let response_action = record
        .response_action
        .and_then(|action| action.parse().ok());

    Ok(Alert {
        id: record.id,
        patient_name: record.patient_name,
        heart_rate: record.heart_rate,
        spo2: record.spo2,
        latitude: record.latitude,
        longitude: record.longitude,
        triggered_at: record.timestamp,
        status,
        response_action,
    })
}

/// Convert from domain entity to data model for an archived alert outcome
pub fn convert_to_data_history_entry(entry: &HistoryEntry)
    -> care_watch_data::models::HistoryEntryRecord
{
    care_watch_data::models::HistoryEntryRecord {
        id: entry.id,
        date: entry.date.clone(),
        time: entry.time.clone(),
        location: entry.location.clone(),
        heart_rate: entry.heart_rate,
        spo2: entry.spo2,
        response_status: entry.response_status.to_string(),
    }
}

/// Convert from data model to domain entity for an archived alert outcome
pub fn convert_to_domain_history_entry(record: care_watch_data::models::HistoryEntryRecord)
    -> Result<HistoryEntry, String>
{
    Ok(HistoryEntry {
        id: record.id,
        date: record.date,
        time: record.time,
        location: record.location,
        heart_rate: record.heart_rate,
        spo2: record.spo2,
        response_status: record.response_status.parse()?,
    })
}

/// Convert the live dashboard state into the persisted storage document
pub fn convert_to_persisted_state(state: &DashboardState)
    -> care_watch_data::models::PersistedState
{
    care_watch_data::models::PersistedState {
        patient: convert_to_data_patient(&state.patient),
        current_alert: state.current_alert.as_ref().map(convert_to_data_alert),
        alert_history: state
            .history
            .entries()
            .iter()
            .map(convert_to_data_history_entry)
            .collect(),
        is_dark_mode: state.dark_mode,
        is_logged_in: state.logged_in,
    }
}

/// Rebuild the live dashboard state from the persisted storage document
///
/// Restoration is lenient: a stored alert that is corrupt or no longer
/// pending is discarded rather than resurrected, and history entries that
/// fail to parse are skipped. The active slot never restarts occupied by
/// anything the caretaker cannot act on.
pub fn convert_to_domain_state(persisted: care_watch_data::models::PersistedState)
    -> DashboardState
{
    let current_alert = persisted
        .current_alert
        .and_then(|record| convert_to_domain_alert(record).ok())
        .filter(Alert::is_pending);

    let entries = persisted
        .alert_history
        .into_iter()
        .filter_map(|record| convert_to_domain_history_entry(record).ok())
        .collect();

    DashboardState {
        patient: convert_to_domain_patient(persisted.patient),
        current_alert,
        history: AlertHistory::from_entries(entries),
        dark_mode: persisted.is_dark_mode,
        logged_in: persisted.is_logged_in,
    }
}
