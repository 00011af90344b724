use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::conversions;
use crate::entities::{
    Alert, AlertDecision, AlertHistory, AlertResponse, DashboardState, HistoryEntry,
    HistorySummary, IngestOutcome, Patient, PatientStatus, StaleAction, VitalReading,
};
use crate::services::vitals::{battery_zone, heart_rate_zone, spo2_zone, VitalZone};
use care_watch_data::store::StateStore;

/// Dashboard service errors
#[derive(Debug, Error)]
pub enum DashboardServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Response aimed at an alert that is no longer active
    #[error("Stale action: {0}")]
    StaleAction(#[from] StaleAction),

    /// Rejected login attempt
    #[error("Please enter both email and password")]
    InvalidCredentials,

    /// State store error
    #[error("Store error: {0}")]
    StoreError(String),

    /// State lock error
    #[error("Lock error: {0}")]
    LockError(String),
}

/// Running counters for the ingest pipeline and alert lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Readings that advanced the vitals projection
    pub readings_applied: u64,

    /// Readings skipped because a newer one was already applied
    pub readings_stale: u64,

    /// Readings rejected by validation
    pub readings_rejected: u64,

    /// Alerts raised, fall-flagged and manual combined
    pub alerts_raised: u64,

    /// Fall signals and manual triggers dropped while an alert was pending
    pub duplicates_suppressed: u64,

    /// Caretaker responses rejected as stale
    pub stale_actions: u64,
}

/// Everything the dashboard screen renders, in one consistent snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// The monitored patient and live vitals
    pub patient: Patient,

    /// Derived condition: emergency wins over inactivity, inactivity over safe
    pub patient_status: PatientStatus,

    /// The pending alert, if any
    pub current_alert: Option<Alert>,

    /// Display zone for the current heart rate
    pub heart_rate_zone: VitalZone,

    /// Display zone for the current SpO2
    pub spo2_zone: VitalZone,

    /// Display zone for the wearable battery
    pub battery_zone: VitalZone,

    /// Dashboard theme flag
    pub dark_mode: bool,

    /// Session flag
    pub logged_in: bool,
}

/// A rendered CSV export of the alert history
#[derive(Debug, Clone)]
pub struct CsvExport {
    /// Suggested download file name
    pub file_name: String,

    /// CSV payload, header line first
    pub content: String,
}

/// Trait for dashboard service operations
#[async_trait]
pub trait DashboardServiceTrait {
    /// Validate an incoming reading against the ingestion ranges
    fn validate_reading(&self, reading: &VitalReading) -> Result<(), DashboardServiceError>;

    /// Ingest one reading: vitals projection first, then the fall decision
    async fn ingest_reading(
        &self,
        reading: VitalReading,
    ) -> Result<IngestOutcome, DashboardServiceError>;

    /// Raise an operator-initiated test alert; `None` when one is already pending
    async fn trigger_test_alert(&self) -> Result<Option<Alert>, DashboardServiceError>;

    /// Accept the pending alert; the caretaker takes over
    async fn respond_accept(&self, alert_id: Uuid)
        -> Result<HistoryEntry, DashboardServiceError>;

    /// Decline the pending alert and escalate to the emergency contacts
    async fn respond_decline(&self, alert_id: Uuid)
        -> Result<HistoryEntry, DashboardServiceError>;

    /// Decline the pending alert and dispatch an ambulance
    async fn respond_ambulance(
        &self,
        alert_id: Uuid,
    ) -> Result<HistoryEntry, DashboardServiceError>;

    /// Place a call to the patient; never touches the alert lifecycle
    fn call_patient(&self) -> Result<(), DashboardServiceError>;

    /// Clear the active slot and restore baseline vitals, keeping history
    async fn reset_system(&self) -> Result<(), DashboardServiceError>;

    /// Full dashboard snapshot with derived status and display zones
    fn dashboard(&self) -> Result<DashboardSnapshot, DashboardServiceError>;

    /// The pending alert, if any
    fn current_alert(&self) -> Result<Option<Alert>, DashboardServiceError>;

    /// Archived alert outcomes, newest first
    fn alert_history(&self) -> Result<Vec<HistoryEntry>, DashboardServiceError>;

    /// Aggregates across the archived outcomes
    fn history_summary(&self) -> Result<HistorySummary, DashboardServiceError>;

    /// Drop all archived outcomes
    async fn clear_history(&self) -> Result<(), DashboardServiceError>;

    /// Render the alert history as a CSV download
    fn export_history_csv(&self) -> Result<CsvExport, DashboardServiceError>;

    /// Open a caretaker session
    async fn login(&self, email: &str, password: &str) -> Result<(), DashboardServiceError>;

    /// Close the caretaker session
    async fn logout(&self) -> Result<(), DashboardServiceError>;

    /// Flip the dashboard theme, returning the new dark-mode flag
    async fn toggle_dark_mode(&self) -> Result<bool, DashboardServiceError>;

    /// Wipe the store and restart from the baseline state
    async fn clear_all_data(&self) -> Result<(), DashboardServiceError>;

    /// Snapshot of the running counters
    fn ingest_stats(&self) -> IngestStats;

    /// Most recent persistence failure, cleared by the next successful save
    fn store_notice(&self) -> Option<String>;
}

#[derive(Debug, Default)]
struct IngestCounters {
    readings_applied: AtomicU64,
    readings_stale: AtomicU64,
    readings_rejected: AtomicU64,
    alerts_raised: AtomicU64,
    duplicates_suppressed: AtomicU64,
    stale_actions: AtomicU64,
}

impl IngestCounters {
    fn snapshot(&self) -> IngestStats {
        IngestStats {
            readings_applied: self.readings_applied.load(Ordering::Relaxed),
            readings_stale: self.readings_stale.load(Ordering::Relaxed),
            readings_rejected: self.readings_rejected.load(Ordering::Relaxed),
            alerts_raised: self.alerts_raised.load(Ordering::Relaxed),
            duplicates_suppressed: self.duplicates_suppressed.load(Ordering::Relaxed),
            stale_actions: self.stale_actions.load(Ordering::Relaxed),
        }
    }
}

/// Dashboard service owning the live monitoring state
///
/// All mutations run as a single closure under the state lock, so every
/// check-then-act decision in the alert lifecycle is atomic. The store is
/// written after the lock is released; a failing store degrades the service
/// to in-memory operation instead of failing caretaker actions.
pub struct DashboardService<S: StateStore> {
    state: Mutex<DashboardState>,
    store: S,
    counters: IngestCounters,
    store_notice: Mutex<Option<String>>,
}

impl<S: StateStore> DashboardService<S> {
    /// Create a service around a fresh baseline state
    pub fn new(store: S) -> Self {
        Self::with_state(store, DashboardState::baseline(Utc::now()))
    }

    /// Create a service from the persisted document, falling back to the
    /// baseline when the store is empty or unreadable
    pub async fn load_or_baseline(store: S) -> Self {
        let state = match store.load().await {
            Ok(Some(persisted)) => {
                info!("Restored dashboard state from the store");
                conversions::convert_to_domain_state(persisted)
            }
            Ok(None) => {
                info!("No persisted state found, starting from baseline");
                DashboardState::baseline(Utc::now())
            }
            Err(e) => {
                warn!("Failed to load persisted state, starting from baseline: {}", e);
                DashboardState::baseline(Utc::now())
            }
        };
        Self::with_state(store, state)
    }

    fn with_state(store: S, state: DashboardState) -> Self {
        Self {
            state: Mutex::new(state),
            store,
            counters: IngestCounters::default(),
            store_notice: Mutex::new(None),
        }
    }

    /// Run one closure under the state lock
    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut DashboardState) -> T,
    ) -> Result<T, DashboardServiceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| DashboardServiceError::LockError(e.to_string()))?;
        Ok(apply(&mut state))
    }

    /// Read through the state lock
    fn read<T>(
        &self,
        view: impl FnOnce(&DashboardState) -> T,
    ) -> Result<T, DashboardServiceError> {
        let state = self
            .state
            .lock()
            .map_err(|e| DashboardServiceError::LockError(e.to_string()))?;
        Ok(view(&state))
    }

    /// Write the current state to the store.
    ///
    /// Never fails the caller: the in-memory state machine stays
    /// authoritative, and a failing save is surfaced through the store
    /// notice until a later save succeeds.
    async fn persist(&self) {
        let snapshot = match self.read(conversions::convert_to_persisted_state) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Skipping persistence, state lock unavailable: {}", e);
                return;
            }
        };

        match self.store.save(&snapshot).await {
            Ok(()) => self.set_store_notice(None),
            Err(e) => {
                warn!("Failed to persist dashboard state: {}", e);
                self.set_store_notice(Some(format!("State persistence failing: {}", e)));
            }
        }
    }

    fn set_store_notice(&self, notice: Option<String>) {
        if let Ok(mut slot) = self.store_notice.lock() {
            *slot = notice;
        }
    }

    /// Drive the pending alert to a terminal status and archive it
    async fn respond(
        &self,
        alert_id: Uuid,
        response: AlertResponse,
    ) -> Result<HistoryEntry, DashboardServiceError> {
        match self.mutate(|state| state.respond(alert_id, response))? {
            Ok(entry) => {
                info!("Alert {} archived as {}", alert_id, entry.response_status);
                self.persist().await;
                Ok(entry)
            }
            Err(stale) => {
                self.counters.stale_actions.fetch_add(1, Ordering::Relaxed);
                warn!("Rejected response to alert {}: {}", alert_id, stale);
                Err(stale.into())
            }
        }
    }
}

#[async_trait]
impl<S: StateStore + Send + Sync> DashboardServiceTrait for DashboardService<S> {
    /// Validate an incoming reading against the ingestion ranges
    fn validate_reading(&self, reading: &VitalReading) -> Result<(), DashboardServiceError> {
        // Use the validator crate's validation
        if let Err(validation_errors) = reading.validate() {
            // Convert validation errors to a meaningful error message
            let error_message = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors
                        .iter()
                        .map(|err| {
                            if let Some(msg) = &err.message {
                                msg.to_string()
                            } else {
                                format!("Invalid {}", field)
                            }
                        })
                        .collect();
                    format!("{}: {}", field, error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            return Err(DashboardServiceError::ValidationError(error_message));
        }

        Ok(())
    }

    /// Ingest one reading: vitals projection first, then the fall decision
    async fn ingest_reading(
        &self,
        reading: VitalReading,
    ) -> Result<IngestOutcome, DashboardServiceError> {
        if let Err(e) = self.validate_reading(&reading) {
            self.counters.readings_rejected.fetch_add(1, Ordering::Relaxed);
            return Err(e);
        }

        let outcome = self.mutate(|state| state.ingest(&reading))?;

        if outcome.vitals_applied {
            self.counters.readings_applied.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.readings_stale.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Reading {} older than the vitals projection, skipped",
                reading.source_id
            );
        }

        match outcome.alert {
            AlertDecision::Raised(id) => {
                self.counters.alerts_raised.fetch_add(1, Ordering::Relaxed);
                info!("Fall detected, alert {} raised", id);
            }
            AlertDecision::Suppressed => {
                self.counters
                    .duplicates_suppressed
                    .fetch_add(1, Ordering::Relaxed);
                info!(
                    "Fall signal from reading {} suppressed, an alert is already pending",
                    reading.source_id
                );
            }
            AlertDecision::None => {}
        }

        if outcome.vitals_applied || matches!(outcome.alert, AlertDecision::Raised(_)) {
            self.persist().await;
        }

        Ok(outcome)
    }

    /// Raise an operator-initiated test alert; `None` when one is already pending
    async fn trigger_test_alert(&self) -> Result<Option<Alert>, DashboardServiceError> {
        let alert = self.mutate(|state| state.trigger_manual_alert(Utc::now()))?;

        match &alert {
            Some(alert) => {
                self.counters.alerts_raised.fetch_add(1, Ordering::Relaxed);
                info!("Test alert {} raised", alert.id);
                self.persist().await;
            }
            None => {
                self.counters
                    .duplicates_suppressed
                    .fetch_add(1, Ordering::Relaxed);
                info!("Test alert suppressed, an alert is already pending");
            }
        }

        Ok(alert)
    }

    /// Accept the pending alert; the caretaker takes over
    async fn respond_accept(
        &self,
        alert_id: Uuid,
    ) -> Result<HistoryEntry, DashboardServiceError> {
        self.respond(alert_id, AlertResponse::Accept).await
    }

    /// Decline the pending alert and escalate to the emergency contacts
    async fn respond_decline(
        &self,
        alert_id: Uuid,
    ) -> Result<HistoryEntry, DashboardServiceError> {
        self.respond(alert_id, AlertResponse::Decline).await
    }

    /// Decline the pending alert and dispatch an ambulance
    async fn respond_ambulance(
        &self,
        alert_id: Uuid,
    ) -> Result<HistoryEntry, DashboardServiceError> {
        self.respond(alert_id, AlertResponse::Ambulance).await
    }

    /// Place a call to the patient; never touches the alert lifecycle
    fn call_patient(&self) -> Result<(), DashboardServiceError> {
        let device_id = self.read(|state| state.patient.device_id.clone())?;
        info!("Initiating call to patient via device {}", device_id);
        Ok(())
    }

    /// Clear the active slot and restore baseline vitals, keeping history
    async fn reset_system(&self) -> Result<(), DashboardServiceError> {
        self.mutate(|state| state.reset(Utc::now()))?;
        info!("System reset, baseline vitals restored");
        self.persist().await;
        Ok(())
    }

    /// Full dashboard snapshot with derived status and display zones
    fn dashboard(&self) -> Result<DashboardSnapshot, DashboardServiceError> {
        let now = Utc::now();
        self.read(|state| {
            let patient_status = state.patient.status(state.has_pending_alert(), now);
            DashboardSnapshot {
                patient_status,
                current_alert: state.current_alert.clone(),
                heart_rate_zone: heart_rate_zone(state.patient.current_heart_rate),
                spo2_zone: spo2_zone(state.patient.current_spo2),
                battery_zone: battery_zone(state.patient.wearable_battery),
                dark_mode: state.dark_mode,
                logged_in: state.logged_in,
                patient: state.patient.clone(),
            }
        })
    }

    /// The pending alert, if any
    fn current_alert(&self) -> Result<Option<Alert>, DashboardServiceError> {
        self.read(|state| state.current_alert.clone())
    }

    /// Archived alert outcomes, newest first
    fn alert_history(&self) -> Result<Vec<HistoryEntry>, DashboardServiceError> {
        self.read(|state| state.history.entries().to_vec())
    }

    /// Aggregates across the archived outcomes
    fn history_summary(&self) -> Result<HistorySummary, DashboardServiceError> {
        self.read(|state| state.history.summarize())
    }

    /// Drop all archived outcomes
    async fn clear_history(&self) -> Result<(), DashboardServiceError> {
        self.mutate(|state| state.history.clear())?;
        info!("Alert history cleared");
        self.persist().await;
        Ok(())
    }

    /// Render the alert history as a CSV download
    fn export_history_csv(&self) -> Result<CsvExport, DashboardServiceError> {
        let content = self.read(|state| state.history.to_csv())?;
        Ok(CsvExport {
            file_name: AlertHistory::csv_file_name(Utc::now().date_naive()),
            content,
        })
    }

    /// Open a caretaker session
    async fn login(&self, email: &str, password: &str) -> Result<(), DashboardServiceError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(DashboardServiceError::InvalidCredentials);
        }

        self.mutate(|state| state.logged_in = true)?;
        info!("Caretaker session opened");
        self.persist().await;
        Ok(())
    }

    /// Close the caretaker session
    async fn logout(&self) -> Result<(), DashboardServiceError> {
        self.mutate(|state| state.logged_in = false)?;
        info!("Caretaker session closed");
        self.persist().await;
        Ok(())
    }

    /// Flip the dashboard theme, returning the new dark-mode flag
    async fn toggle_dark_mode(&self) -> Result<bool, DashboardServiceError> {
        let dark_mode = self.mutate(|state| {
            state.dark_mode = !state.dark_mode;
            state.dark_mode
        })?;
        self.persist().await;
        Ok(dark_mode)
    }

    /// Wipe the store and restart from the baseline state
    async fn clear_all_data(&self) -> Result<(), DashboardServiceError> {
        self.store
            .wipe()
            .await
            .map_err(|e| DashboardServiceError::StoreError(e.to_string()))?;

        self.mutate(|state| *state = DashboardState::baseline(Utc::now()))?;
        self.set_store_notice(None);
        info!("All stored data cleared");
        Ok(())
    }

    /// Snapshot of the running counters
    fn ingest_stats(&self) -> IngestStats {
        self.counters.snapshot()
    }

    /// Most recent persistence failure, cleared by the next successful save
    fn store_notice(&self) -> Option<String> {
        self.store_notice.lock().ok().and_then(|slot| slot.clone())
    }
}

/// Create a dashboard service backed by the given state store, restoring
/// any persisted state
pub async fn create_dashboard_service<S: StateStore + 'static>(
    store: S,
) -> Arc<dyn DashboardServiceTrait + Send + Sync> {
    Arc::new(DashboardService::load_or_baseline(store).await)
}

/// Create a dashboard service over a throwaway in-memory store for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub async fn create_mock_dashboard_service() -> Arc<dyn DashboardServiceTrait + Send + Sync> {
    create_dashboard_service(care_watch_data::store::InMemoryStateStore::new()).await
}
