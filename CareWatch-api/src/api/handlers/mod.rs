pub mod alerts;
pub mod dashboard;
pub mod health;
pub mod history;
pub mod session;
pub mod telemetry;

// Tests module
#[cfg(test)]
mod tests;

use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

use care_watch_domain::services::{DashboardServiceError, DashboardServiceTrait};

use crate::entities::common::ErrorResponse;

// Re-export handlers for easier imports
pub use alerts::{
    call_patient, respond_accept, respond_ambulance, respond_decline, trigger_test_alert,
};
pub use dashboard::{get_dashboard, reset_system};
pub use health::health_check;
pub use history::{clear_history, export_history, get_history, get_history_summary};
pub use session::{clear_data, login, logout, toggle_theme};
pub use telemetry::{get_latest_vitals, get_vitals_history, publish_reading};

/// Service type for dependency injection
pub type DashboardApiService = Arc<dyn DashboardServiceTrait + Send + Sync>;

/// Map a domain service error onto the public error contract.
///
/// Stale caretaker actions come back as conflicts so the dashboard can
/// refresh instead of retrying; store and lock failures never leak details.
pub(crate) fn service_error_response(error: DashboardServiceError) -> Response {
    let message = error.to_string();
    match error {
        DashboardServiceError::StaleAction(_) => {
            warn!("Rejected stale caretaker action: {}", message);
            (StatusCode::CONFLICT, Json(ErrorResponse::conflict(&message))).into_response()
        }
        DashboardServiceError::ValidationError(_) => {
            warn!("Validation failed: {}", message);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation_error(&message, None)),
            )
                .into_response()
        }
        DashboardServiceError::InvalidCredentials => {
            info!("Login rejected: {}", message);
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::unauthorized(&message)),
            )
                .into_response()
        }
        DashboardServiceError::StoreError(_) | DashboardServiceError::LockError(_) => {
            error!("Dashboard service failure: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response()
        }
    }
}
