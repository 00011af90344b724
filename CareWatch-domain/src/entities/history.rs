use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::alert::{Alert, AlertStatus};

/// Immutable record of an alert at the moment it reached a terminal status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
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
    pub response_status: AlertStatus,
}

impl HistoryEntry {
    /// Snapshot an alert that just reached a terminal status.
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            id: alert.id,
            date: alert.triggered_at.format("%Y-%m-%d").to_string(),
            time: alert.triggered_at.format("%H:%M:%S").to_string(),
            location: format!("{:.4}, {:.4}", alert.latitude, alert.longitude),
            heart_rate: alert.heart_rate,
            spo2: alert.spo2,
            response_status: alert.status,
        }
    }
}

/// Aggregates across the history ledger
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Total archived alerts
    pub total_alerts: usize,

    /// Alerts the caretaker accepted
    pub accepted: usize,

    /// Alerts the caretaker declined (escalations and ambulance calls)
    pub declined: usize,

    /// Mean heart rate across entries, rounded; 0 for an empty ledger
    pub avg_heart_rate: f64,
}

/// Append-only ledger of terminal alert outcomes, newest first
///
/// Entries are never mutated. `clear` is the only operation that shrinks
/// the ledger, and it is always caretaker-initiated.
#[derive(Debug, Clone, Default)]
pub struct AlertHistory {
    entries: Vec<HistoryEntry>,
}

impl AlertHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ledger from restored entries, preserving their order.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    /// Prepend an entry.
    ///
    /// The ledger never deduplicates by id; uniqueness is the alert
    /// engine's invariant, not this type's.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    /// Caretaker-initiated full clear.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregate view for the history screen.
    pub fn summarize(&self) -> HistorySummary {
        let total_alerts = self.entries.len();
        let accepted = self
            .entries
            .iter()
            .filter(|e| e.response_status == AlertStatus::Accepted)
            .count();
        let declined = self
            .entries
            .iter()
            .filter(|e| e.response_status == AlertStatus::Declined)
            .count();

        let avg_heart_rate = if total_alerts == 0 {
            0.0
        } else {
            let sum: f64 = self.entries.iter().map(|e| e.heart_rate).sum();
            (sum / total_alerts as f64).round()
        };

        HistorySummary {
            total_alerts,
            accepted,
            declined,
            avg_heart_rate,
        }
    }

    /// CSV rendering of the ledger in current order.
    ///
    /// The location field contains a comma and is quoted.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Date,Time,Location,Heart Rate,SpO2,Status\n");
        for entry in &self.entries {
            csv.push_str(&format!(
                "{},{},\"{}\",{},{},{}\n",
                entry.date,
                entry.time,
                entry.location,
                entry.heart_rate,
                entry.spo2,
                entry.response_status.as_str(),
            ));
        }
        csv
    }

    /// File name for a CSV export generated on `date`.
    pub fn csv_file_name(date: NaiveDate) -> String {
        format!("alert-history-{}.csv", date.format("%Y-%m-%d"))
    }
}
