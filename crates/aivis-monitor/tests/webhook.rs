//! Integration tests for `WebhookNotifier` using wiremock HTTP mocks.

use aivis_core::{AlertEvent, AlertType, Severity};
use aivis_monitor::{AlertNotifier, DeliveryOutcome, WebhookNotifier};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn drop_event() -> AlertEvent {
    AlertEvent {
        alert_type: AlertType::VisibilityDrop,
        title: "Visibility dropped".to_string(),
        body: "Overall visibility fell from 80 to 65.".to_string(),
        severity: Severity::Warning,
        metadata: serde_json::json!({ "previous_score": 80, "current_score": 65 }),
    }
}

#[tokio::test]
async fn posts_json_payload_and_reports_delivered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hooks/aivis"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(serde_json::json!({
            "type": "visibility_drop",
            "title": "Visibility dropped",
            "metadata": { "previous_score": 80 }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(5).expect("client construction should not fail");
    let outcome = notifier
        .deliver(&format!("{}/hooks/aivis", server.uri()), &drop_event())
        .await;

    assert_eq!(outcome, DeliveryOutcome::Delivered);
}

#[tokio::test]
async fn non_success_status_is_a_failed_delivery_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(5).unwrap();
    let outcome = notifier.deliver(&server.uri(), &drop_event()).await;

    assert!(matches!(outcome, DeliveryOutcome::Failed(ref reason) if reason.contains("500")));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_failed_delivery() {
    let notifier = WebhookNotifier::new(2).unwrap();
    let outcome = notifier
        .deliver("http://127.0.0.1:9/unreachable", &drop_event())
        .await;

    assert!(!outcome.is_delivered());
}
