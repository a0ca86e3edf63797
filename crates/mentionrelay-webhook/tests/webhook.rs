//! Integration tests for `WebhookClient` using wiremock HTTP mocks.

use chrono::{TimeZone, Utc};
use mentionrelay_core::Profile;
use mentionrelay_sprout::Mention;
use mentionrelay_webhook::{WebhookClient, WebhookError, WebhookPayload};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload() -> WebhookPayload {
    let mention: Mention = serde_json::from_value(json!({
        "text": "Where can I buy this?",
        "from": { "name": "Sam", "screen_name": "sam" },
        "network": "INSTAGRAM",
        "sentiment": "neutral",
        "hashtags": ["thc"],
        "metrics": { "likes": 20, "replies": 0, "shares_count": 0 }
    }))
    .unwrap();
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
    WebhookPayload::from_mention(&mention, "Brand", &Profile::final_corrected(), now)
}

#[tokio::test]
async fn send_posts_flattened_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hooks/catch/1/abc/"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "topic_name": "Brand",
            "author_handle": "sam",
            "network": "INSTAGRAM",
            "hashtags": "thc",
            "likes": 20,
            "priority": "MEDIUM",
            "bot_version": "cloud-v3.0-final-corrected"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebhookClient::new(&format!("{}/hooks/catch/1/abc/", server.uri()), 5).unwrap();
    client.send(&payload()).await.expect("send should succeed");
}

#[tokio::test]
async fn send_fails_once_without_retry_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebhookClient::new(&format!("{}/hook", server.uri()), 5).unwrap();
    let err = client.send(&payload()).await.unwrap_err();

    match err {
        WebhookError::Http(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(503)),
    }
}

#[tokio::test]
async fn send_reports_connection_failure() {
    let client = WebhookClient::new("http://127.0.0.1:1/hook", 2).unwrap();
    let result = client.send(&payload()).await;
    assert!(matches!(result, Err(WebhookError::Http(_))));
}
