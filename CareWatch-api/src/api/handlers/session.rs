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
use crate::entities::session::{LoginRequest, SessionResponse, ThemeResponse};

use super::{service_error_response, DashboardApiService};

/// Open a caretaker session
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionResponse),
        (status = 401, description = "Missing credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "session"
)]
#[instrument(skip(service, request))]
pub async fn login(
    State(service): State<DashboardApiService>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, Response> {
    info!("Caretaker login attempt");

    match service.login(&request.email, &request.password).await {
        Ok(()) => Ok((StatusCode::OK, Json(SessionResponse { logged_in: true }))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Close the caretaker session
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Session closed", body = SessionResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "session"
)]
#[instrument(skip(service))]
pub async fn logout(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    info!("Caretaker logging out");

    match service.logout().await {
        Ok(()) => Ok((StatusCode::OK, Json(SessionResponse { logged_in: false }))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Flip the dashboard theme
#[utoipa::path(
    post,
    path = "/api/v1/settings/theme",
    responses(
        (status = 200, description = "Theme toggled", body = ThemeResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "session"
)]
#[instrument(skip(service))]
pub async fn toggle_theme(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    match service.toggle_dark_mode().await {
        Ok(dark_mode) => Ok((StatusCode::OK, Json(ThemeResponse { dark_mode }))),
        Err(e) => Err(service_error_response(e)),
    }
}

/// Wipe the stored dashboard state and restart from the baseline
#[utoipa::path(
    post,
    path = "/api/v1/settings/clear-data",
    responses(
        (status = 200, description = "Data cleared, fresh snapshot returned", body = DashboardSnapshot),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "session"
)]
#[instrument(skip(service))]
pub async fn clear_data(
    State(service): State<DashboardApiService>,
) -> Result<impl IntoResponse, Response> {
    info!("Clearing all stored dashboard data");

    if let Err(e) = service.clear_all_data().await {
        return Err(service_error_response(e));
    }

    match service.dashboard() {
        Ok(snapshot) => Ok((StatusCode::OK, Json(snapshot))),
        Err(e) => Err(service_error_response(e)),
    }
}
