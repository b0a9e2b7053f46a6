// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Gupshup client against a mock HTTP backend.

use klaxon_config::model::GupshupConfig;
use klaxon_gupshup::{Client, GupshupError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, api_key: &str) -> GupshupConfig {
    GupshupConfig {
        enable: true,
        base_url: server.uri(),
        api_key: api_key.to_string(),
        source: "KLAXON".to_string(),
    }
}

#[tokio::test]
async fn sends_form_encoded_post_with_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("apikey", "secret"))
        .and(body_string_contains("channel=SMS"))
        .and(body_string_contains("source=KLAXON"))
        .and(body_string_contains("destination=%2B15555550123"))
        .and(body_string_contains("message=hello+world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messageId": "msg-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&test_config(&server, "secret"));
    let id = client.send_sms("+15555550123", "hello world").await.unwrap();
    assert_eq!(id, "msg-123");
}

#[tokio::test]
async fn omits_api_key_header_when_unset_and_reads_nested_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": { "msgId": "msg-999" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&test_config(&server, ""));
    let id = client.send_sms("+15555550123", "hi").await.unwrap();
    assert_eq!(id, "msg-999");

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("apikey"));
}

#[tokio::test]
async fn invalid_json_response_is_success_without_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not-json"))
        .mount(&server)
        .await;

    let client = Client::new(&test_config(&server, ""));
    let id = client.send_sms("+15555550123", "hi").await.unwrap();
    assert_eq!(id, "");
}

#[tokio::test]
async fn http_error_surfaces_with_body_and_classification() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502)
                .set_body_string(r#"{"code":"123","message":"error"}"#),
        )
        .mount(&server)
        .await;

    let client = Client::new(&test_config(&server, ""));
    let err = client.send_sms("+15555550123", "hi").await.unwrap_err();
    assert!(err.is_temporary());
    match err {
        GupshupError::Status { status, body } => {
            assert_eq!(status.as_u16(), 502);
            assert!(body.contains("error"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn client_error_status_is_permanent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad number"))
        .mount(&server)
        .await;

    let client = Client::new(&test_config(&server, ""));
    let err = client.send_sms("not-a-number", "hi").await.unwrap_err();
    assert!(!err.is_temporary());
}
