mod common;

use serde_json::{json, Value};

use common::{closed_port_url, TestServer};
use pa_agent::tools::{build_payload, ToolOutcome, WebhookAction, WebhookArgs, WebhookClient};

fn send_email_args() -> WebhookArgs {
    serde_json::from_value(json!({
        "action": "send_email",
        "data": {
            "recipient_email": "sarah@example.com",
            "subject": "Meeting tomorrow",
            "message": "Don't forget our meeting at 2pm"
        }
    }))
    .unwrap()
}

#[test]
fn test_payload_is_flattened() {
    let payload = build_payload(&send_email_args());

    assert_eq!(
        payload,
        json!({
            "action": "send_email",
            "recipient_email": "sarah@example.com",
            "subject": "Meeting tomorrow",
            "message": "Don't forget our meeting at 2pm"
        })
    );
    assert!(payload.get("data").is_none());
}

#[test]
fn test_explicit_action_wins_over_data_field() {
    let args: WebhookArgs = serde_json::from_value(json!({
        "action": "book_meeting",
        "data": {"action": "send_email", "topic": "demo"}
    }))
    .unwrap();

    let payload = build_payload(&args);

    assert_eq!(payload["action"], "book_meeting");
    assert_eq!(payload["topic"], "demo");
}

#[test]
fn test_missing_data_defaults_to_empty() {
    let args: WebhookArgs = serde_json::from_value(json!({"action": "book_meeting"})).unwrap();

    assert_eq!(args.action, WebhookAction::BookMeeting);
    assert_eq!(build_payload(&args), json!({"action": "book_meeting"}));
}

#[test]
fn test_unknown_action_is_rejected() {
    let result = serde_json::from_value::<WebhookArgs>(json!({"action": "order_pizza", "data": {}}));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_trigger_posts_flat_payload_and_returns_reply() {
    let server = TestServer::start(200, "application/json", r#"{"status":"sent","id":42}"#).await;
    let client = WebhookClient::new(server.url(), 5).unwrap();

    let outcome = client.trigger(&send_email_args()).await;

    assert_eq!(outcome, ToolOutcome::Success(json!({"status": "sent", "id": 42})));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].head.starts_with("POST /webhook"));
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent, build_payload(&send_email_args()));

    server.shutdown().await;
}

#[tokio::test]
async fn test_server_error_becomes_error_envelope() {
    let server = TestServer::start(500, "text/plain", "workflow crashed").await;
    let client = WebhookClient::new(server.url(), 5).unwrap();

    let outcome = client.trigger(&send_email_args()).await;

    let value = outcome.to_value();
    assert_eq!(value["status"], "error");
    let message = value["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to call n8n: HTTP status 500"));
    assert!(message.contains("workflow crashed"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_non_json_reply_becomes_error_envelope() {
    let server = TestServer::start(200, "text/plain", "Workflow was started").await;
    let client = WebhookClient::new(server.url(), 5).unwrap();

    let outcome = client.trigger(&send_email_args()).await;

    match outcome {
        ToolOutcome::Failure(message) => {
            assert!(message.starts_with("n8n returned a non-JSON response"));
            assert!(message.contains("Workflow was started"));
        }
        other => panic!("expected failure, got {:?}", other),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_webhook_becomes_error_envelope() {
    let client = WebhookClient::new(closed_port_url().await, 5).unwrap();

    let outcome = client.trigger(&send_email_args()).await;

    assert!(outcome.is_failure());
    let content: Value = serde_json::from_str(&outcome.to_content()).unwrap();
    assert_eq!(content["status"], "error");
    assert!(content["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to call n8n"));
}

#[tokio::test]
async fn test_silent_webhook_times_out_as_error_envelope() {
    let server = common::StallingServer::start(None).await;
    let client = WebhookClient::new(server.url(), 1).unwrap();

    let started = std::time::Instant::now();
    let outcome = client.trigger(&send_email_args()).await;

    assert!(started.elapsed() < std::time::Duration::from_secs(10));
    match outcome {
        ToolOutcome::Failure(message) => {
            assert!(!message.is_empty());
            assert!(message.starts_with("Failed to call n8n"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}
