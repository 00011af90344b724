use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};
use uuid::Uuid;

// Import domain entities and services
use care_watch_domain::entities::{Alert, HistoryEntry};

// Import our entities
use crate::entities::common::ErrorResponse;

use super::{service_error_response, DashboardApiService};

/// Raise an operator-initiated test alert
#[utoipa::path(
    post,
    path = "/api/v1/alerts/test",
    responses(
        (status = 201, description = "Test alert raised", body = Alert),
        (status = 409, description = "An alert is already active", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(service))]
pub async fn trigger_test_alert(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse + std::fmt::Debug, Response> {
    info!("Manual test alert requested");

    match service.trigger_test_alert().await {
        Ok(Some(alert)) => {
            info!("Test alert raised with ID: {}", alert.id);
            Ok((StatusCode::CREATED, Json(alert)))
        }
        Ok(None) => {
            info!("Test alert suppressed, an alert is already active");
            Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse::conflict("An alert is already active")),
            )
                .into_response())
        }
        Err(e) => Err(service_error_response(e)),
    }
}

/// Accept the pending alert; the caretaker takes over
#[utoipa::path(
    post,
    path = "/api/v1/alerts/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Identifier of the pending alert")
    ),
    responses(
        (status = 200, description = "Alert accepted and archived", body = HistoryEntry),
        (status = 409, description = "No pending alert with this identifier", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(service))]
pub async fn respond_accept(
    State(service): State<DashboardApiService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse + std::fmt::Debug, Response> {
    info!("Caretaker accepting alert {}", id);

    match service.respond_accept(id).await {
        Ok(entry) => Ok((StatusCode::OK, Json(entry))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Decline the pending alert and escalate to the emergency contacts
#[utoipa::path(
    post,
    path = "/api/v1/alerts/{id}/decline",
    params(
        ("id" = Uuid, Path, description = "Identifier of the pending alert")
    ),
    responses(
        (status = 200, description = "Alert declined and archived", body = HistoryEntry),
        (status = 409, description = "No pending alert with this identifier", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(service))]
pub async fn respond_decline(
    State(service): State<DashboardApiService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    info!("Caretaker declining alert {}, escalating to contacts", id);

    match service.respond_decline(id).await {
        Ok(entry) => Ok((StatusCode::OK, Json(entry))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Decline the pending alert and dispatch an ambulance
#[utoipa::path(
    post,
    path = "/api/v1/alerts/{id}/ambulance",
    params(
        ("id" = Uuid, Path, description = "Identifier of the pending alert")
    ),
    responses(
        (status = 200, description = "Ambulance dispatched, alert archived", body = HistoryEntry),
        (status = 409, description = "No pending alert with this identifier", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(service))]
pub async fn respond_ambulance(
    State(service): State<DashboardApiService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse + std::fmt::Debug, Response> {
    info!("Caretaker calling an ambulance for alert {}", id);

    match service.respond_ambulance(id).await {
        Ok(entry) => Ok((StatusCode::OK, Json(entry))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Place a call to the patient; never touches the alert lifecycle
#[utoipa::path(
    post,
    path = "/api/v1/alerts/call-patient",
    responses(
        (status = 200, description = "Call request acknowledged"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(service))]
pub async fn call_patient(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    match service.call_patient() {
        Ok(()) => Ok((StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))),
        Err(e) => Err(service_error_response(e)),
    }
}
