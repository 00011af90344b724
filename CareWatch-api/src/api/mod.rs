pub mod handlers;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tracing::warn;

use care_watch_domain::entities::patient::BASELINE_PATIENT_ID;
use care_watch_domain::feed::{TelemetryHub, DEFAULT_BUFFER_CAPACITY};
use care_watch_domain::ingest::{spawn_reading_pump, ReadingPump};
use care_watch_domain::services::create_dashboard_service;
use care_watch_domain::store::StateStore;

use handlers::DashboardApiService;

/// The wired application: the HTTP router plus the background reading pump.
///
/// Keep this value alive for as long as the server runs; dropping it stops
/// the pump and the feed subscription with it.
pub struct Application {
    router: Router,
    pump: ReadingPump,
}

impl Application {
    /// Router handle for serving or for driving requests in tests
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Stop the reading pump and release the feed subscription
    pub async fn shutdown(self) {
        self.pump.shutdown().await;
    }
}

/// Create the wired application on top of the given state store
pub async fn create_application<S: StateStore + 'static>(store: S) -> Application {
    let service: DashboardApiService = create_dashboard_service(store).await;

    // The hub carries exactly one patient's device stream
    let patient_id = match service.dashboard() {
        Ok(snapshot) => snapshot.patient.id,
        Err(e) => {
            warn!("Could not read patient id from state, using baseline: {}", e);
            BASELINE_PATIENT_ID.to_string()
        }
    };

    let hub = Arc::new(TelemetryHub::new(
        patient_id.clone(),
        DEFAULT_BUFFER_CAPACITY,
    ));
    let pump = spawn_reading_pump(hub.clone(), Arc::clone(&service), patient_id);

    let health_service =
        handlers::health::create_health_service(pump.status(), Arc::clone(&service));

    let router = routes::create_app(service, hub, health_service);

    Application { router, pump }
}
