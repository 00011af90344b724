use axum::{
    extract::{Json, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

// Import domain entities and services
use care_watch_domain::entities::{HistoryEntry, HistorySummary};

// Import our entities
use crate::entities::common::ErrorResponse;

use super::{service_error_response, DashboardApiService};

/// Get the archived alert outcomes, newest first
#[utoipa::path(
    get,
    path = "/api/v1/history",
    responses(
        (status = 200, description = "Alert history retrieved", body = [HistoryEntry]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "history"
)]
#[instrument(skip(service))]
pub async fn get_history(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    match service.alert_history() {
        Ok(entries) => Ok((StatusCode::OK, Json(entries))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Get aggregate statistics across the archived alert outcomes
#[utoipa::path(
    get,
    path = "/api/v1/history/summary",
    responses(
        (status = 200, description = "History summary retrieved", body = HistorySummary),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "history"
)]
#[instrument(skip(service))]
pub async fn get_history_summary(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    match service.history_summary() {
        Ok(summary) => Ok((StatusCode::OK, Json(summary))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Drop all archived alert outcomes
#[utoipa::path(
    delete,
    path = "/api/v1/history",
    responses(
        (status = 204, description = "Alert history cleared"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "history"
)]
#[instrument(skip(service))]
pub async fn clear_history(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    info!("Clearing alert history");

    match service.clear_history().await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Download the alert history as a CSV file
#[utoipa::path(
    get,
    path = "/api/v1/history/export",
    responses(
        (status = 200, description = "CSV export of the alert history", content_type = "text/csv"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "history"
)]
#[instrument(skip(service))]
pub async fn export_history(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    match service.export_history_csv() {
        Ok(export) => {
            info!("Exporting alert history as {}", export.file_name);
            let headers = [
                (CONTENT_TYPE, "text/csv".to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.file_name),
                ),
            ];
            Ok((StatusCode::OK, headers, export.content))
        }
        Err(e) => Err(service_error_response(e)),
    }
}
