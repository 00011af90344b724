use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tracing::debug;

use care_watch_domain::feed::TelemetryHub;
use care_watch_domain::health::HealthServiceTrait;

use crate::api::handlers::{self, DashboardApiService};
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app(
    service: DashboardApiService,
    hub: Arc<TelemetryHub>,
    health_service: Arc<dyn HealthServiceTrait + Send + Sync>,
) -> Router {
    debug!("Creating application router");

    // Set up API routes
    let api_routes = Router::new()
        // Define specific routes before parametrized routes to avoid conflicts
        .route("/telemetry", post(handlers::publish_reading))
        .route("/vitals/latest", get(handlers::get_latest_vitals))
        .route("/vitals/history", get(handlers::get_vitals_history))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/alerts/test", post(handlers::trigger_test_alert))
        .route("/alerts/call-patient", post(handlers::call_patient))
        .route("/alerts/:id/accept", post(handlers::respond_accept))
        .route("/alerts/:id/decline", post(handlers::respond_decline))
        .route("/alerts/:id/ambulance", post(handlers::respond_ambulance))
        .route("/system/reset", post(handlers::reset_system))
        .route(
            "/history",
            get(handlers::get_history).delete(handlers::clear_history),
        )
        .route("/history/summary", get(handlers::get_history_summary))
        .route("/history/export", get(handlers::export_history))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/settings/theme", post(handlers::toggle_theme))
        .route("/settings/clear-data", post(handlers::clear_data));

    debug!("API routes configured");

    // Set up public routes
    let public_routes = Router::new().route("/health", get(handlers::health_check));

    debug!("Public routes configured");

    // Combine all routes
    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(Extension(hub))
        .layer(Extension(health_service))
        .with_state(service);

    debug!("API routes nested");

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    // Apply the CORS policy for the dashboard frontend
    let app = configure_cors(app);
    debug!("CORS configuration applied");

    // Initialize health check service startup time
    handlers::health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    // Get Swagger UI routes
    let swagger = configure_swagger_routes();

    // Merge Swagger UI with the app router
    app.merge(swagger)
}

/// Apply the CORS policy for the dashboard frontend
pub fn configure_cors(app: Router) -> Router {
    use axum::http::header;
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    app.layer(cors)
}
