use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Once};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument};
use utoipa::ToSchema;

use async_trait::async_trait;
use care_watch_domain::health::{
    ComponentStatus as DomainComponentStatus, HealthServiceTrait, SystemHealth,
    SystemStatus,
};
use care_watch_domain::ingest::FeedStatus;
use care_watch_domain::services::dashboard::IngestStats;

use super::DashboardApiService;

/// Health check payload
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status ("ok", "degraded", or "error")
    pub status: String,
    /// Crate version the server was built from
    pub version: String,
    /// Unix timestamp at response time
    pub timestamp: u64,
    /// Seconds since the server started, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Per-component breakdown
    pub components: ComponentStatus,
    /// Running counters for the ingest pipeline and alert lifecycle
    pub counters: IngestStats,
    /// Deployment environment name
    pub environment: String,
}

/// The two components the dashboard depends on
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Telemetry feed subscription
    pub feed: ComponentHealthStatus,
    /// Dashboard state store
    pub store: ComponentHealthStatus,
}

/// Status of one component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// "ok", "degraded", or "error"
    pub status: String,
    /// Detail message, present when the component is not healthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

/// Record the server start time. Later calls are no-ops, so the binary and
/// the router factory may both call this.
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let _ = SERVER_START_TIME.set(unix_now());
    });
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Express one domain component in the public payload shape. A component
/// the health service did not report counts as healthy.
fn component_from(health: &SystemHealth, name: &str) -> ComponentHealthStatus {
    match health.components.get(name) {
        Some(component) => ComponentHealthStatus {
            status: status_label(&component.status).to_string(),
            message: component.details.clone(),
        },
        None => ComponentHealthStatus {
            status: "ok".to_string(),
            message: None,
        },
    }
}

fn status_label(status: &DomainComponentStatus) -> &'static str {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(service, health_service))]
pub async fn health_check(
    State(service): State<DashboardApiService>,
    Extension(health_service): Extension<Arc<dyn HealthServiceTrait + Send + Sync>>,
) -> Result<impl IntoResponse, axum::response::Response> {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME
        .get()
        .map(|&start_time| now.saturating_sub(start_time));

    let system_health = health_service.get_system_health().await;

    let (overall, status_code) = match system_health.status {
        SystemStatus::Healthy => ("ok", StatusCode::OK),
        SystemStatus::Degraded => ("degraded", StatusCode::SERVICE_UNAVAILABLE),
        SystemStatus::Unhealthy => ("error", StatusCode::INTERNAL_SERVER_ERROR),
    };

    let response = HealthResponse {
        status: overall.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: ComponentStatus {
            feed: component_from(&system_health, "feed"),
            store: component_from(&system_health, "store"),
        },
        counters: service.ingest_stats(),
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    Ok((status_code, Json(response)))
}

/// Health service backed by the live reading pump and dashboard service
pub struct HealthService {
    feed_status: Arc<FeedStatus>,
    service: DashboardApiService,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("feed_connected", &self.feed_status.is_connected())
            .finish()
    }
}

impl HealthService {
    /// Create a new health service watching the given pump and dashboard handles
    pub fn new(feed_status: Arc<FeedStatus>, service: DashboardApiService) -> Self {
        HealthService {
            feed_status,
            service,
        }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        components.insert(
            "feed".to_string(),
            care_watch_domain::health::feed_component(self.check_feed_status().await),
        );
        components.insert(
            "store".to_string(),
            care_watch_domain::health::store_component(self.check_store_status().await.err()),
        );

        let status = care_watch_domain::health::overall_status(&components);

        SystemHealth { status, components }
    }

    async fn check_feed_status(&self) -> bool {
        self.feed_status.is_connected()
    }

    async fn check_store_status(&self) -> Result<(), String> {
        match self.service.store_notice() {
            Some(notice) => Err(notice),
            None => Ok(()),
        }
    }
}

/// Factory function to create a health service
pub fn create_health_service(
    feed_status: Arc<FeedStatus>,
    service: DashboardApiService,
) -> Arc<dyn HealthServiceTrait + Send + Sync> {
    Arc::new(HealthService::new(feed_status, service))
}
