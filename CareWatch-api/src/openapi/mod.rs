use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Telemetry endpoints
        crate::api::handlers::telemetry::publish_reading,
        crate::api::handlers::telemetry::get_latest_vitals,
        crate::api::handlers::telemetry::get_vitals_history,

        // Dashboard endpoints
        crate::api::handlers::dashboard::get_dashboard,
        crate::api::handlers::dashboard::reset_system,

        // Alert endpoints
        crate::api::handlers::alerts::trigger_test_alert,
        crate::api::handlers::alerts::respond_accept,
        crate::api::handlers::alerts::respond_decline,
        crate::api::handlers::alerts::respond_ambulance,
        crate::api::handlers::alerts::call_patient,

        // History endpoints
        crate::api::handlers::history::get_history,
        crate::api::handlers::history::get_history_summary,
        crate::api::handlers::history::clear_history,
        crate::api::handlers::history::export_history,

        // Session endpoints
        crate::api::handlers::session::login,
        crate::api::handlers::session::logout,
        crate::api::handlers::session::toggle_theme,
        crate::api::handlers::session::clear_data
    ),
    components(
        schemas(
            // Entities
            crate::entities::common::ErrorResponse,
            crate::entities::session::LoginRequest,
            crate::entities::session::SessionResponse,
            crate::entities::session::ThemeResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Telemetry handlers
            crate::api::handlers::telemetry::TelemetryReceipt,
            crate::api::handlers::telemetry::VitalsHistoryParams,

            // Domain schemas
            care_watch_domain::entities::Patient,
            care_watch_domain::entities::EmergencyContact,
            care_watch_domain::entities::PatientStatus,
            care_watch_domain::entities::Alert,
            care_watch_domain::entities::AlertStatus,
            care_watch_domain::entities::ResponseAction,
            care_watch_domain::entities::HistoryEntry,
            care_watch_domain::entities::HistorySummary,
            care_watch_domain::entities::VitalReading,
            care_watch_domain::services::VitalZone,
            care_watch_domain::services::dashboard::DashboardSnapshot,
            care_watch_domain::services::dashboard::IngestStats
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "telemetry", description = "Wearable telemetry ingestion and queries"),
        (name = "dashboard", description = "Dashboard snapshot and system reset"),
        (name = "alerts", description = "Fall alert lifecycle endpoints"),
        (name = "history", description = "Alert history and export endpoints"),
        (name = "session", description = "Caretaker session and settings endpoints")
    ),
    info(
        title = "CareWatch API",
        version = "0.1.0",
        description = "API for monitoring a patient's wearable telemetry and managing fall alerts",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
struct ApiDoc;
