use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::alert::{Alert, AlertStatus, ResponseAction};
use super::history::{AlertHistory, HistoryEntry};
use super::patient::Patient;
use super::reading::VitalReading;

/// Caretaker response intents accepted by the alert state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertResponse {
    /// Caretaker takes over
    Accept,

    /// Caretaker declines; handling escalates to the emergency contacts
    Decline,

    /// Caretaker declines and dispatches an ambulance
    Ambulance,
}

impl AlertResponse {
    /// Terminal status and recorded action this response produces.
    /// An ambulance call is an escalation variant, so it also lands on
    /// `Declined`.
    pub fn outcome(&self) -> (AlertStatus, ResponseAction) {
        match self {
            AlertResponse::Accept => (AlertStatus::Accepted, ResponseAction::Responded),
            AlertResponse::Decline => (AlertStatus::Declined, ResponseAction::Escalated),
            AlertResponse::Ambulance => (AlertStatus::Declined, ResponseAction::AmbulanceCalled),
        }
    }
}

/// A response intent that does not match the current pending alert
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleAction {
    /// No alert is active at all
    #[error("No active alert to respond to")]
    NoActiveAlert,

    /// An alert is active, but under a different id
    #[error("Alert {requested} is not the active alert {active}")]
    AlertMismatch {
        /// Id the caller tried to respond to
        requested: Uuid,
        /// Id of the alert actually occupying the slot
        active: Uuid,
    },
}

/// Alert-side result of ingesting one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// The reading carried no fall flag
    None,

    /// A new alert was raised
    Raised(Uuid),

    /// Fall flag seen while an alert was already pending
    Suppressed,
}

/// What a single ingested reading did to the dashboard state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Whether the vitals projection advanced (false for stale readings)
    pub vitals_applied: bool,

    /// What happened on the alert side
    pub alert: AlertDecision,
}

/// The process-wide dashboard state container
///
/// Every mutation is a single method call on `&mut self`, so a caller
/// holding the state behind a lock gets check-then-act atomicity for the
/// whole decision. The active slot only ever holds a pending alert.
/// Persistence never serializes this type directly; the storage layout is
/// owned by the data-layer records.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The monitored patient and vitals projection
    pub patient: Patient,

    /// The active alert slot
    pub current_alert: Option<Alert>,

    /// Ledger of terminal alert outcomes
    pub history: AlertHistory,

    /// Dashboard theme flag
    pub dark_mode: bool,

    /// Session flag
    pub logged_in: bool,
}

impl DashboardState {
    /// Fresh state around the baseline patient.
    pub fn baseline(now: DateTime<Utc>) -> Self {
        Self {
            patient: Patient::baseline(now),
            current_alert: None,
            history: AlertHistory::new(),
            dark_mode: false,
            logged_in: false,
        }
    }

    pub fn has_pending_alert(&self) -> bool {
        self.current_alert.as_ref().map_or(false, Alert::is_pending)
    }

    /// Ingest one validated reading: vitals first, then the fall decision.
    ///
    /// A fall flag raises a new alert only while no alert is pending;
    /// otherwise it is dropped and reported as `Suppressed`. A stale
    /// reading skips the vitals projection but its fall flag still counts;
    /// ordering protects the projection, not the fall event itself.
    pub fn ingest(&mut self, reading: &VitalReading) -> IngestOutcome {
        let vitals_applied = self.patient.apply_reading(reading);

        let alert = if !reading.fall_detected {
            AlertDecision::None
        } else if self.has_pending_alert() {
            AlertDecision::Suppressed
        } else {
            let alert = Alert::from_reading(reading, &self.patient.name);
            let id = alert.id;
            self.current_alert = Some(alert);
            AlertDecision::Raised(id)
        };

        IngestOutcome {
            vitals_applied,
            alert,
        }
    }

    /// Raise an operator-initiated test alert, subject to the same
    /// duplicate-suppression rule as fall readings. `None` when suppressed.
    ///
    /// The synthetic vitals land on the projection too, exactly as a real
    /// fall-flagged reading would. Battery is left alone; the simulated
    /// event carries no battery sample.
    pub fn trigger_manual_alert(&mut self, now: DateTime<Utc>) -> Option<Alert> {
        if self.has_pending_alert() {
            return None;
        }
        let alert = Alert::test_alert(&self.patient.name, now);
        self.patient.current_heart_rate = alert.heart_rate;
        self.patient.current_spo2 = alert.spo2;
        self.patient.last_sync_time = now;
        self.current_alert = Some(alert.clone());
        Some(alert)
    }

    /// Drive the pending alert to its terminal status, archive it, and
    /// clear the slot. Exactly one history entry per terminal transition.
    pub fn respond(
        &mut self,
        alert_id: Uuid,
        response: AlertResponse,
    ) -> Result<HistoryEntry, StaleAction> {
        let active = match self.current_alert.as_mut() {
            Some(alert) => alert,
            None => return Err(StaleAction::NoActiveAlert),
        };
        if active.id != alert_id {
            return Err(StaleAction::AlertMismatch {
                requested: alert_id,
                active: active.id,
            });
        }

        let (status, action) = response.outcome();
        active.status = status;
        active.response_action = Some(action);
        let entry = HistoryEntry::from_alert(active);

        self.history.append(entry.clone());
        self.current_alert = None;
        Ok(entry)
    }

    /// Clear the active slot unconditionally and restore baseline vitals.
    /// The history ledger is untouched.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.current_alert = None;
        self.patient.reset(now);
    }
}
