#[cfg(test)]
mod alerts_tests {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use uuid::Uuid;

    use care_watch_domain::services::{create_mock_dashboard_service, DashboardServiceTrait};

    use crate::api::handlers::alerts::{
        call_patient, respond_accept, respond_ambulance, trigger_test_alert,
    };

    #[tokio::test]
    async fn test_trigger_test_alert_returns_created() {
        let service = create_mock_dashboard_service().await;

        let response = trigger_test_alert(State(service))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_second_test_alert_conflicts() {
        let service = create_mock_dashboard_service().await;

        trigger_test_alert(State(service.clone())).await.unwrap();

        let response = trigger_test_alert(State(service)).await.unwrap_err();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_respond_without_active_alert_conflicts() {
        let service = create_mock_dashboard_service().await;

        let response = respond_accept(State(service), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_respond_with_wrong_id_conflicts() {
        let service = create_mock_dashboard_service().await;
        service.trigger_test_alert().await.unwrap();

        let response = respond_ambulance(State(service.clone()), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // The mismatch must not consume the pending alert
        assert!(service.current_alert().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_accept_archives_and_returns_the_entry() {
        let service = create_mock_dashboard_service().await;
        let alert = service.trigger_test_alert().await.unwrap().unwrap();

        let response = respond_accept(State(service.clone()), Path(alert.id))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(service.current_alert().unwrap().is_none());
        assert_eq!(service.alert_history().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_call_patient_leaves_state_alone() {
        let service = create_mock_dashboard_service().await;

        let response = call_patient(State(service.clone()))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(service.current_alert().unwrap().is_none());
        assert!(service.alert_history().unwrap().is_empty());
    }
}
