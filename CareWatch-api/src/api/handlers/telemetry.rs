use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

// Import domain entities and services
use care_watch_domain::entities::conversions::convert_to_domain_reading;
use care_watch_domain::entities::VitalReading;
use care_watch_domain::feed::{TelemetryHub, VitalReadingRecord, VitalsFeed};

// Import our entities
use crate::entities::common::ErrorResponse;

use super::DashboardApiService;

/// Query parameters for retrieving recent vital readings
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct VitalsHistoryParams {
    /// Maximum number of results (default: 100, max: 1000)
    pub limit: Option<usize>,
}

/// Acknowledgement for a telemetry reading accepted into the feed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TelemetryReceipt {
    /// Live feed subscribers the reading was delivered to
    pub subscribers: usize,
}

/// Accept a wearable telemetry reading into the realtime feed
#[utoipa::path(
    post,
    path = "/api/v1/telemetry",
    request_body(
        content = serde_json::Value,
        description = "Wearable reading payload with `id`, `created_at`, `heart_rate`, \
            `spo2`, `latitude`, `longitude` and `fall_detected`. Numeric fields accept \
            JSON numbers or numeric strings; `patient_name` and `battery` may be omitted.",
        content_type = "application/json"
    ),
    responses(
        (status = 202, description = "Reading accepted into the feed", body = TelemetryReceipt),
        (status = 400, description = "Reading failed validation", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "telemetry"
)]
#[instrument(skip(service, hub, payload))]
pub async fn publish_reading(
    State(service): State<DashboardApiService>,
    Extension(hub): Extension<Arc<TelemetryHub>>,
    Json(payload): Json<VitalReadingRecord>,
) -> Result<impl IntoResponse + std::fmt::Debug, Response> {
    info!("Telemetry reading received from device");

    // Validate up front so a bad reading never enters the feed
    let reading = convert_to_domain_reading(payload.clone());
    if let Err(e) = service.validate_reading(&reading) {
        let error_message = e.to_string();
        warn!("Rejected telemetry reading: {}", error_message);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation_error(&error_message, None)),
        )
            .into_response());
    }

    match hub.publish(payload) {
        Ok(subscribers) => Ok((StatusCode::ACCEPTED, Json(TelemetryReceipt { subscribers }))),
        Err(e) => {
            error!("Error publishing telemetry reading: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response())
        }
    }
}

/// Get the most recent vital reading for the monitored patient
#[utoipa::path(
    get,
    path = "/api/v1/vitals/latest",
    responses(
        (status = 200, description = "Most recent vital reading", body = VitalReading),
        (status = 404, description = "No readings received yet", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "telemetry"
)]
#[instrument(skip(service, hub))]
pub async fn get_latest_vitals(
    State(service): State<DashboardApiService>,
    Extension(hub): Extension<Arc<TelemetryHub>>,
) -> Result<impl IntoResponse + std::fmt::Debug, Response> {
    let patient_id = monitored_patient_id(&service)?;

    match hub.query_latest(&patient_id).await {
        Ok(Some(record)) => {
            let reading = convert_to_domain_reading(record);
            Ok((StatusCode::OK, Json(reading)))
        }
        Ok(None) => {
            info!("No vital readings buffered for patient {}", patient_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::not_found("vital reading")),
            )
                .into_response())
        }
        Err(e) => {
            error!("Error querying latest vitals: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response())
        }
    }
}

/// Get recent vital readings for the monitored patient, newest first
#[utoipa::path(
    get,
    path = "/api/v1/vitals/history",
    params(
        VitalsHistoryParams
    ),
    responses(
        (status = 200, description = "Recent vital readings retrieved", body = [VitalReading]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "telemetry"
)]
#[instrument(skip(service, hub))]
pub async fn get_vitals_history(
    State(service): State<DashboardApiService>,
    Extension(hub): Extension<Arc<TelemetryHub>>,
    Query(params): Query<VitalsHistoryParams>,
) -> Result<impl IntoResponse, Response> {
    // Process query parameters
    let limit = params.limit.unwrap_or(100).min(1000); // Cap at 1000

    let patient_id = monitored_patient_id(&service)?;

    match hub.query_history(&patient_id, limit).await {
        Ok(records) => {
            let readings: Vec<VitalReading> =
                records.into_iter().map(convert_to_domain_reading).collect();
            Ok((StatusCode::OK, Json(readings)))
        }
        Err(e) => {
            error!("Error querying vitals history: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response())
        }
    }
}

/// Resolve the id of the patient this deployment monitors
fn monitored_patient_id(service: &DashboardApiService) -> Result<String, Response> {
    match service.dashboard() {
        Ok(snapshot) => Ok(snapshot.patient.id),
        Err(e) => {
            error!("Error reading dashboard state: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response())
        }
    }
}
