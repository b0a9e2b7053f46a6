// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for SMS dispatch: Twilio REST path, Gupshup delegation,
//! and result classification, all against mock HTTP backends.

use klaxon_config::KlaxonConfig;
use klaxon_core::traits::MessageSender;
use klaxon_core::types::{DestId, NotificationPayload, PayloadBase, SendState};
use klaxon_twilio::{Sms, Voice, sms_dest, voice_dest};
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn base_config() -> KlaxonConfig {
    let mut cfg = KlaxonConfig::default();
    cfg.general.application_name = "Klaxon".to_string();
    cfg.general.public_url = "https://klaxon.example".to_string();
    cfg.twilio.enable = true;
    cfg.twilio.account_sid = "AC0123456789".to_string();
    cfg.twilio.auth_token = "secret-token".to_string();
    cfg.twilio.from_number = "+19999999999".to_string();
    cfg
}

fn alert_payload(dest: klaxon_core::types::Destination) -> NotificationPayload {
    NotificationPayload::Alert {
        base: PayloadBase {
            message_id: "msg-001".into(),
            dest_id: DestId::ContactMethod(Uuid::new_v4()),
            dest,
        },
        alert_id: 42,
        summary: "Example alert".into(),
        details: String::new(),
        service_id: "svc-123".into(),
        service_name: "Example".into(),
        meta: Default::default(),
        original: None,
    }
}

#[tokio::test]
async fn sms_uses_gupshup_when_enabled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("apikey", "gs-secret"))
        .and(body_string_contains("channel=SMS"))
        .and(body_string_contains("source=GSRC"))
        .and(body_string_contains("destination=%2B15555551234"))
        .and(body_string_contains("Alert+%2342"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messageId": "msg-abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = base_config();
    cfg.gupshup.enable = true;
    cfg.gupshup.base_url = server.uri();
    cfg.gupshup.api_key = "gs-secret".to_string();
    cfg.gupshup.source = "GSRC".to_string();

    let sms = Sms::new(&cfg);
    let sent = sms
        .send(&alert_payload(sms_dest("+15555551234")))
        .await
        .unwrap();

    assert_eq!(sent.state, SendState::Sent);
    assert_eq!(sent.external_id.as_deref(), Some("msg-abc"));

    // the rendered body carries the app name, summary, and callback link
    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    let decoded: Vec<(String, String)> = serde_urlencoded::from_str(&body).unwrap();
    let text = &decoded.iter().find(|(k, _)| k == "message").unwrap().1;
    assert!(text.contains("Klaxon: Alert #42: Example alert"));
    assert!(text.contains("https://klaxon.example/alerts/42"));
}

#[tokio::test]
async fn sms_posts_to_twilio_when_gupshup_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC0123456789/Messages.json"))
        .and(header_exists("authorization"))
        .and(body_string_contains("To=%2B15555551234"))
        .and(body_string_contains("From=%2B19999999999"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "sid": "SM123", "status": "queued"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = base_config();
    cfg.twilio.base_url = server.uri();

    let sms = Sms::new(&cfg);
    let sent = sms
        .send(&alert_payload(sms_dest("+15555551234")))
        .await
        .unwrap();

    assert_eq!(sent.state, SendState::Sent);
    assert_eq!(sent.external_id.as_deref(), Some("SM123"));
}

#[tokio::test]
async fn voice_posts_twiml_to_calls_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC0123456789/Calls.json"))
        .and(body_string_contains("Twiml="))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "sid": "CA456"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = base_config();
    cfg.twilio.base_url = server.uri();

    let voice = Voice::new(&cfg);
    let sent = voice
        .send(&alert_payload(voice_dest("+15555551234")))
        .await
        .unwrap();

    assert_eq!(sent.state, SendState::Sent);
    assert_eq!(sent.external_id.as_deref(), Some("CA456"));
}

#[tokio::test]
async fn server_errors_classify_as_temporary() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let mut cfg = base_config();
    cfg.twilio.base_url = server.uri();

    let sms = Sms::new(&cfg);
    let sent = sms
        .send(&alert_payload(sms_dest("+15555551234")))
        .await
        .unwrap();
    assert_eq!(sent.state, SendState::FailedTemp);
}

#[tokio::test]
async fn rejected_requests_classify_as_permanent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"message":"invalid number"}"#),
        )
        .mount(&server)
        .await;

    let mut cfg = base_config();
    cfg.twilio.base_url = server.uri();

    let sms = Sms::new(&cfg);
    let sent = sms
        .send(&alert_payload(sms_dest("+15555551234")))
        .await
        .unwrap();
    assert_eq!(sent.state, SendState::FailedPerm);
    assert!(sent.details.contains("invalid number"));
}

#[tokio::test]
async fn gupshup_failure_classification_flows_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("rejected"))
        .mount(&server)
        .await;

    let mut cfg = base_config();
    cfg.gupshup.enable = true;
    cfg.gupshup.base_url = server.uri();
    cfg.gupshup.source = "GSRC".to_string();

    let sms = Sms::new(&cfg);
    let sent = sms
        .send(&alert_payload(sms_dest("+15555551234")))
        .await
        .unwrap();
    assert_eq!(sent.state, SendState::FailedPerm);
}
