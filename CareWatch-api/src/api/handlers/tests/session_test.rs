#[cfg(test)]
mod session_tests {
    use axum::extract::{Json, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use care_watch_domain::services::{create_mock_dashboard_service, DashboardServiceTrait};

    use crate::api::handlers::session::{clear_data, login, logout, toggle_theme};
    use crate::entities::session::LoginRequest;

    fn credentials(email: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn test_login_with_credentials_succeeds() {
        let service = create_mock_dashboard_service().await;

        let response = login(
            State(service.clone()),
            credentials("caretaker@example.com", "secret"),
        )
        .await
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(service.dashboard().unwrap().logged_in);
    }

    #[tokio::test]
    async fn test_login_with_blank_password_is_unauthorized() {
        let service = create_mock_dashboard_service().await;

        let response = login(
            State(service.clone()),
            credentials("caretaker@example.com", ""),
        )
        .await
        .unwrap_err();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!service.dashboard().unwrap().logged_in);
    }

    #[tokio::test]
    async fn test_logout_flips_the_session_flag() {
        let service = create_mock_dashboard_service().await;
        service.login("caretaker@example.com", "secret").await.unwrap();

        let response = logout(State(service.clone()))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!service.dashboard().unwrap().logged_in);
    }

    #[tokio::test]
    async fn test_toggle_theme_round_trip() {
        let service = create_mock_dashboard_service().await;

        let response = toggle_theme(State(service.clone()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["darkMode"], true);

        let response = toggle_theme(State(service))
            .await
            .unwrap()
            .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["darkMode"], false);
    }

    #[tokio::test]
    async fn test_clear_data_returns_the_baseline_snapshot() {
        let service = create_mock_dashboard_service().await;
        service.toggle_dark_mode().await.unwrap();
        service.trigger_test_alert().await.unwrap();

        let response = clear_data(State(service.clone()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["darkMode"], false);
        assert!(body["currentAlert"].is_null());
        assert_eq!(body["patient"]["id"], "PAT001");
    }
}
