use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

// Import domain entities and services
use care_watch_domain::services::dashboard::DashboardSnapshot;

// Import our entities
use crate::entities::common::ErrorResponse;

use super::{service_error_response, DashboardApiService};

/// Get the full dashboard snapshot
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot retrieved", body = DashboardSnapshot),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard"
)]
#[instrument(skip(service))]
pub async fn get_dashboard(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    match service.dashboard() {
        Ok(snapshot) => Ok((StatusCode::OK, Json(snapshot))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Clear the active alert and restore baseline vitals, keeping history
#[utoipa::path(
    post,
    path = "/api/v1/system/reset",
    responses(
        (status = 200, description = "System reset, fresh snapshot returned", body = DashboardSnapshot),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard"
)]
#[instrument(skip(service))]
pub async fn reset_system(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    info!("System reset requested");

    if let Err(e) = service.reset_system().await {
        return Err(service_error_response(e));
    }

    match service.dashboard() {
        Ok(snapshot) => Ok((StatusCode::OK, Json(snapshot))),
        Err(e) => Err(service_error_response(e)),
    }
}
