#[cfg(test)]
mod health_tests {
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::Extension;
    use std::sync::Arc;

    use care_watch_domain::health::{HealthServiceTrait, SystemStatus};
    use care_watch_domain::services::create_mock_dashboard_service;
    use care_watch_domain::testing::MockHealthService;

    use crate::api::handlers::health::{health_check, initialize_server_start_time};

    /// Run the health check handler against a configured mock health service
    async fn drive_health_check(mock: MockHealthService) -> axum::response::Response {
        initialize_server_start_time();

        let service = create_mock_dashboard_service().await;
        let health_service = Arc::new(mock) as Arc<dyn HealthServiceTrait + Send + Sync>;

        health_check(State(service), Extension(health_service))
            .await
            .unwrap()
            .into_response()
    }

    #[tokio::test]
    async fn test_healthy_system_reports_ok() {
        let response = drive_health_check(MockHealthService::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failing_store_reports_degraded() {
        let mock = MockHealthService::new()
            .with_failing_store("State persistence failing: disk full")
            .with_system_status(SystemStatus::Degraded);

        let response = drive_health_check(mock).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_disconnected_feed_reports_error() {
        let mock = MockHealthService::new()
            .with_disconnected_feed()
            .with_system_status(SystemStatus::Unhealthy);

        let response = drive_health_check(mock).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_component_details_reach_the_body() {
        let mock = MockHealthService::new()
            .with_failing_store("State persistence failing: disk full")
            .with_system_status(SystemStatus::Degraded);

        let response = drive_health_check(mock).await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["status"], "degraded");
        assert_eq!(body["components"]["feed"]["status"], "ok");
        assert_eq!(body["components"]["store"]["status"], "degraded");
        assert_eq!(
            body["components"]["store"]["message"],
            "State persistence failing: disk full"
        );
        assert!(body["counters"]["readingsApplied"].is_number());
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_disconnected_feed_carries_details() {
        let mock = MockHealthService::new()
            .with_disconnected_feed()
            .with_system_status(SystemStatus::Unhealthy);

        let response = drive_health_check(mock).await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["status"], "error");
        assert_eq!(body["components"]["feed"]["status"], "error");
        assert_eq!(
            body["components"]["feed"]["message"],
            "Telemetry feed subscription has ended"
        );
    }
}
