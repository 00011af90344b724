// Reading pump: forwards feed telemetry into the dashboard service

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::entities::conversions;
use crate::services::DashboardServiceTrait;
use care_watch_data::feed::{FeedError, VitalsFeed};

/// Live connection indicator for the reading pump
#[derive(Debug, Default)]
pub struct FeedStatus {
    connected: AtomicBool,
}

impl FeedStatus {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

/// Handle to the background task that drives readings from the feed into
/// the dashboard service
///
/// Dropping the handle aborts the task, which releases its feed
/// subscription on the way out. `shutdown` does the same but waits for the
/// task to finish first.
pub struct ReadingPump {
    handle: JoinHandle<()>,
    status: Arc<FeedStatus>,
}

impl ReadingPump {
    /// Shared connection indicator, safe to hold past shutdown.
    pub fn status(&self) -> Arc<FeedStatus> {
        Arc::clone(&self.status)
    }

    /// Stop the pump and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
        self.status.set_connected(false);
        info!("Reading pump stopped");
    }
}

impl Drop for ReadingPump {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn the reading pump for one patient's device stream.
///
/// The subscription is taken before the catch-up query so a reading
/// published between the two cannot be missed; at worst the same reading
/// is seen twice, and the monotonic sync time makes the repeat a no-op.
pub fn spawn_reading_pump(
    feed: Arc<dyn VitalsFeed>,
    service: Arc<dyn DashboardServiceTrait + Send + Sync>,
    patient_id: String,
) -> ReadingPump {
    let status = Arc::new(FeedStatus::default());
    let task_status = Arc::clone(&status);

    let handle = tokio::spawn(async move {
        let mut subscription = feed.subscribe();
        task_status.set_connected(true);
        info!("Reading pump connected for patient {}", patient_id);

        match feed.query_latest(&patient_id).await {
            Ok(Some(record)) => {
                let reading = conversions::convert_to_domain_reading(record);
                if let Err(e) = service.ingest_reading(reading).await {
                    warn!("Catch-up reading rejected: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Catch-up query failed: {}", e),
        }

        loop {
            match subscription.next_reading().await {
                Ok(record) => {
                    let reading = conversions::convert_to_domain_reading(record);
                    if let Err(e) = service.ingest_reading(reading).await {
                        warn!("Reading rejected: {}", e);
                    }
                }
                Err(FeedError::Lagged { skipped }) => {
                    warn!("Reading pump lagged, {} readings dropped", skipped);
                }
                Err(e) => {
                    error!("Reading pump stopping: {}", e);
                    break;
                }
            }
        }

        task_status.set_connected(false);
    });

    ReadingPump { handle, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use uuid::Uuid;

    use crate::services::dashboard::DashboardService;
    use care_watch_data::feed::TelemetryHub;
    use care_watch_data::models::VitalReadingRecord;
    use care_watch_data::store::InMemoryStateStore;

    fn record(offset_secs: i64, fall_detected: bool) -> VitalReadingRecord {
        VitalReadingRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now() + chrono::Duration::seconds(offset_secs),
            patient_name: Some("John Doe".to_string()),
            heart_rate: 88.0,
            spo2: 97.0,
            battery: Some(64.0),
            latitude: 40.7128,
            longitude: -74.0060,
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
        condition()
    }

    #[tokio::test]
    async fn test_pump_forwards_readings_into_the_service() {
        let hub = Arc::new(TelemetryHub::new("PAT001", 16));
        let service: Arc<dyn DashboardServiceTrait + Send + Sync> =
            Arc::new(DashboardService::new(InMemoryStateStore::new()));

        let pump = spawn_reading_pump(hub.clone(), service.clone(), "PAT001".to_string());
        let status = pump.status();
        assert!(wait_until(|| status.is_connected()).await);

        hub.publish(record(1, false)).unwrap();
        assert!(wait_until(|| service.ingest_stats().readings_applied >= 1).await);
        assert_eq!(
            service.dashboard().unwrap().patient.current_heart_rate,
            88.0
        );

        pump.shutdown().await;
        assert!(!status.is_connected());
    }

    #[tokio::test]
    async fn test_pump_raises_alert_on_fall_reading() {
        let hub = Arc::new(TelemetryHub::new("PAT001", 16));
        let service: Arc<dyn DashboardServiceTrait + Send + Sync> =
            Arc::new(DashboardService::new(InMemoryStateStore::new()));

        let pump = spawn_reading_pump(hub.clone(), service.clone(), "PAT001".to_string());
        let status = pump.status();
        assert!(wait_until(|| status.is_connected()).await);

        let fall = record(1, true);
        let fall_id = fall.id;
        hub.publish(fall).unwrap();

        assert!(wait_until(|| service.ingest_stats().alerts_raised >= 1).await);
        assert_eq!(
            service.current_alert().unwrap().map(|alert| alert.id),
            Some(fall_id)
        );

        pump.shutdown().await;
    }

    #[tokio::test]
    async fn test_pump_catches_up_from_the_buffer() {
        let hub = Arc::new(TelemetryHub::new("PAT001", 16));
        // Published before the pump exists; observed after the service's
        // baseline sync time so the catch-up actually lands.
        hub.publish(record(5, false)).unwrap();

        let service: Arc<dyn DashboardServiceTrait + Send + Sync> =
            Arc::new(DashboardService::new(InMemoryStateStore::new()));
        let pump = spawn_reading_pump(hub.clone(), service.clone(), "PAT001".to_string());

        assert!(wait_until(|| service.ingest_stats().readings_applied >= 1).await);

        pump.shutdown().await;
    }

    #[tokio::test]
    async fn test_dropping_the_pump_releases_the_subscription() {
        let hub = Arc::new(TelemetryHub::new("PAT001", 16));
        let service: Arc<dyn DashboardServiceTrait + Send + Sync> =
            Arc::new(DashboardService::new(InMemoryStateStore::new()));

        let pump = spawn_reading_pump(hub.clone(), service, "PAT001".to_string());
        let status = pump.status();
        assert!(wait_until(|| status.is_connected()).await);
        assert_eq!(hub.subscriber_count(), 1);

        drop(pump);
        assert!(wait_until(|| hub.subscriber_count() == 0).await);
    }
}
