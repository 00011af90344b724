use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use care_watch_domain::entities::{AlertStatus, PatientStatus, StaleAction};
use care_watch_domain::feed::{TelemetryHub, VitalReadingRecord, DEFAULT_BUFFER_CAPACITY};
use care_watch_domain::ingest::spawn_reading_pump;
use care_watch_domain::services::{
    create_dashboard_service, DashboardServiceError, DashboardServiceTrait,
};
use care_watch_domain::store::InMemoryStateStore;

// Initialize tracing once for all tests
static INIT: std::sync::Once = std::sync::Once::new();
fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

const PATIENT_ID: &str = "PAT001";

fn record(offset_secs: i64, fall_detected: bool) -> VitalReadingRecord {
    VitalReadingRecord {
        id: Uuid::new_v4(),
        created_at: Utc::now() + chrono::Duration::seconds(offset_secs),
        patient_name: Some("John Doe".to_string()),
        heart_rate: 140.0,
        spo2: 90.0,
        battery: Some(64.0),
        latitude: 40.71,
        longitude: -74.00,
        fall_detected,
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

/// Full stack for one test: hub, dashboard service over an in-memory store,
/// and a running reading pump wired between them. Returns once the pump
/// holds its subscription, so published readings cannot be missed.
async fn live_dashboard() -> (
    Arc<TelemetryHub>,
    Arc<dyn DashboardServiceTrait + Send + Sync>,
    care_watch_domain::ingest::ReadingPump,
) {
    let hub = Arc::new(TelemetryHub::new(PATIENT_ID, DEFAULT_BUFFER_CAPACITY));
    let service = create_dashboard_service(InMemoryStateStore::new()).await;
    let pump = spawn_reading_pump(
        hub.clone(),
        Arc::clone(&service),
        PATIENT_ID.to_string(),
    );
    let status = pump.status();
    assert!(
        wait_until(|| status.is_connected()).await,
        "pump should connect"
    );
    (hub, service, pump)
}

#[tokio::test]
async fn fall_reading_travels_from_feed_to_archived_history() {
    initialize();
    let (hub, service, pump) = live_dashboard().await;

    // A fall-flagged reading arrives from the wearable
    hub.publish(record(1, true)).expect("publish should succeed");
    assert!(
        wait_until(|| service.current_alert().ok().flatten().is_some()).await,
        "fall reading should raise an alert"
    );

    // The alert carries the reading's vitals and starts pending
    let alert = service.current_alert().unwrap().unwrap();
    assert_eq!(alert.status, AlertStatus::Pending);
    assert_eq!(alert.heart_rate, 140.0);
    assert_eq!(alert.spo2, 90.0);

    // The vitals projection followed the same reading
    let snapshot = service.dashboard().unwrap();
    assert_eq!(snapshot.patient.current_heart_rate, 140.0);
    assert_eq!(snapshot.patient_status, PatientStatus::Emergency);

    // Accepting the alert clears the slot and archives exactly one entry
    let entry = service.respond_accept(alert.id).await.unwrap();
    assert_eq!(entry.response_status, AlertStatus::Accepted);
    assert!(service.current_alert().unwrap().is_none());

    let history = service.alert_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, alert.id);
    assert_eq!(history[0].heart_rate, 140.0);

    pump.shutdown().await;
}

#[tokio::test]
async fn back_to_back_falls_archive_a_single_entry() {
    initialize();
    let (hub, service, pump) = live_dashboard().await;

    // Two fall-flagged readings land before anyone responds
    hub.publish(record(1, true)).expect("publish should succeed");
    hub.publish(record(2, true)).expect("publish should succeed");
    assert!(
        wait_until(|| service.ingest_stats().readings_applied >= 2).await,
        "both readings should be ingested"
    );

    // Only the first raised an alert; the slot identity never moved
    let alert = service.current_alert().unwrap().expect("alert expected");
    assert_eq!(service.ingest_stats().alerts_raised, 1);
    assert!(service.ingest_stats().duplicates_suppressed >= 1);

    // The eventual response archives one entry, not two
    service.respond_accept(alert.id).await.unwrap();
    assert_eq!(service.alert_history().unwrap().len(), 1);

    pump.shutdown().await;
}

#[tokio::test]
async fn active_alert_identity_survives_manual_triggers() {
    initialize();
    let (hub, service, pump) = live_dashboard().await;

    hub.publish(record(1, true)).expect("publish should succeed");
    assert!(wait_until(|| service.current_alert().ok().flatten().is_some()).await);
    let original = service.current_alert().unwrap().unwrap();
    let suppressed_before = service.ingest_stats().duplicates_suppressed;

    // Manual triggers while pending are suppressed without touching the slot
    for _ in 0..3 {
        let raised = service.trigger_test_alert().await.unwrap();
        assert!(raised.is_none());
    }
    let still_active = service.current_alert().unwrap().unwrap();
    assert_eq!(still_active.id, original.id);
    assert_eq!(
        service.ingest_stats().duplicates_suppressed,
        suppressed_before + 3
    );

    pump.shutdown().await;
}

#[tokio::test]
async fn repeated_accept_reports_a_stale_action() {
    initialize();
    let (hub, service, pump) = live_dashboard().await;

    hub.publish(record(1, true)).expect("publish should succeed");
    assert!(wait_until(|| service.current_alert().ok().flatten().is_some()).await);
    let alert = service.current_alert().unwrap().unwrap();

    service.respond_accept(alert.id).await.unwrap();

    // The second accept finds no active alert and changes nothing
    let second = service.respond_accept(alert.id).await;
    assert!(matches!(
        second,
        Err(DashboardServiceError::StaleAction(StaleAction::NoActiveAlert))
    ));
    assert_eq!(service.alert_history().unwrap().len(), 1);
    assert_eq!(service.ingest_stats().stale_actions, 1);

    pump.shutdown().await;
}

#[tokio::test]
async fn reset_clears_the_alert_and_restores_baseline_vitals() {
    initialize();
    let (hub, service, pump) = live_dashboard().await;

    // Build one archived entry first, then leave a second alert pending
    hub.publish(record(1, true)).expect("publish should succeed");
    assert!(wait_until(|| service.current_alert().ok().flatten().is_some()).await);
    let first = service.current_alert().unwrap().unwrap();
    service.respond_decline(first.id).await.unwrap();

    hub.publish(record(2, true)).expect("publish should succeed");
    assert!(wait_until(|| service.current_alert().ok().flatten().is_some()).await);

    service.reset_system().await.unwrap();

    // The pending alert is gone without being archived; history keeps its entry
    let snapshot = service.dashboard().unwrap();
    assert!(snapshot.current_alert.is_none());
    assert_eq!(snapshot.patient.current_heart_rate, 72.0);
    assert_eq!(snapshot.patient.current_spo2, 98.0);
    assert_eq!(snapshot.patient_status, PatientStatus::Safe);
    assert_eq!(service.alert_history().unwrap().len(), 1);

    pump.shutdown().await;
}
