// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twilio telephony provider for the Klaxon dispatch engine.
//!
//! Implements the voice and SMS destination types, which share one
//! phone-number argument shape. Voice places a call with a spoken rendering
//! of the payload; SMS posts to the Twilio Messages API, or delegates to the
//! Gupshup backend when that is selected by configuration.

mod render;

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use tracing::{debug, warn};

use klaxon_config::KlaxonConfig;
use klaxon_core::traits::{DestDisplayer, DestValidator, MessageSender, Provider};
use klaxon_core::types::{
    DestType, Destination, DisplayInfo, NotificationPayload, SentMessage, TypeInfo,
};
use klaxon_core::KlaxonError;

pub const DEST_TYPE_TWILIO_VOICE: &str = "builtin-twilio-voice";
pub const DEST_TYPE_TWILIO_SMS: &str = "builtin-twilio-sms";

pub const FIELD_PHONE_NUMBER: &str = "phone_number";

/// Builds a voice destination for an E.164 phone number.
pub fn voice_dest(number: &str) -> Destination {
    Destination::new(DEST_TYPE_TWILIO_VOICE, &[(FIELD_PHONE_NUMBER, number)])
}

/// Builds an SMS destination for an E.164 phone number.
pub fn sms_dest(number: &str) -> Destination {
    Destination::new(DEST_TYPE_TWILIO_SMS, &[(FIELD_PHONE_NUMBER, number)])
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("valid regex"))
}

fn validate_phone_field(field: &str, value: &str) -> Result<(), KlaxonError> {
    if field != FIELD_PHONE_NUMBER {
        return Err(KlaxonError::FieldValidation {
            field: field.to_string(),
            message: "unexpected field".to_string(),
        });
    }
    if !phone_regex().is_match(value) {
        return Err(KlaxonError::FieldValidation {
            field: field.to_string(),
            message: "must be a valid E.164 phone number".to_string(),
        });
    }
    Ok(())
}

fn phone_display(dest: &Destination) -> DisplayInfo {
    DisplayInfo {
        text: dest
            .arg(FIELD_PHONE_NUMBER)
            .unwrap_or("unknown phone number")
            .to_string(),
    }
}

fn phone_from(payload: &NotificationPayload) -> Result<String, KlaxonError> {
    payload
        .base()
        .dest
        .arg(FIELD_PHONE_NUMBER)
        .map(str::to_owned)
        .ok_or_else(|| KlaxonError::FieldValidation {
            field: FIELD_PHONE_NUMBER.to_string(),
            message: "destination is missing a phone number".to_string(),
        })
}

/// POSTs to a Twilio REST resource and maps the response onto the send
/// contract: 2xx carries the returned sid, 429 and 5xx are temporary, other
/// rejections permanent, and transport failures (including timeouts and
/// cancellation) are always temporary.
async fn twilio_post(
    http: &reqwest::Client,
    cfg: &KlaxonConfig,
    resource: &str,
    params: &[(&str, &str)],
) -> Result<SentMessage, KlaxonError> {
    if !cfg.twilio.enable {
        return Err(KlaxonError::Config("twilio is disabled".to_string()));
    }

    let url = format!(
        "{}/2010-04-01/Accounts/{}/{resource}.json",
        cfg.twilio.base_url.trim_end_matches('/'),
        cfg.twilio.account_sid,
    );

    let resp = match http
        .post(&url)
        .basic_auth(&cfg.twilio.account_sid, Some(&cfg.twilio.auth_token))
        .form(params)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(err) => {
            warn!(resource, error = %err, "twilio request failed in transport");
            return Ok(SentMessage::failed_temp(format!(
                "twilio request failed: {err}"
            )));
        }
    };

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if status.is_success() {
        let sid = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("sid").and_then(|s| s.as_str()).map(str::to_owned));
        debug!(resource, sid = sid.as_deref().unwrap_or(""), "twilio accepted");
        return Ok(match sid {
            Some(sid) => SentMessage::sent_with_id(sid),
            None => SentMessage::sent(),
        });
    }

    let details = format!("twilio {resource} rejected: {}", body.trim());
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Ok(SentMessage::failed_temp(details))
    } else {
        Ok(SentMessage::failed_perm(details))
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Voice call provider.
pub struct Voice {
    cfg: KlaxonConfig,
    http: reqwest::Client,
}

impl Voice {
    pub fn new(cfg: &KlaxonConfig) -> Self {
        Self::with_http_client(cfg, reqwest::Client::new())
    }

    pub fn with_http_client(cfg: &KlaxonConfig, http: reqwest::Client) -> Self {
        Self {
            cfg: cfg.clone(),
            http,
        }
    }
}

impl Provider for Voice {
    fn dest_type(&self) -> DestType {
        DEST_TYPE_TWILIO_VOICE.into()
    }

    fn type_info(&self) -> TypeInfo {
        TypeInfo {
            dest_type: self.dest_type(),
            name: "Voice Call",
            enabled: self.cfg.twilio.enable,
            supports_alert_notifications: true,
            supports_status_updates: true,
            supports_user_verification: true,
        }
    }
}

impl DestValidator for Voice {
    fn validate_field(&self, field: &str, value: &str) -> Result<(), KlaxonError> {
        validate_phone_field(field, value)
    }
}

impl DestDisplayer for Voice {
    fn display_info(&self, dest: &Destination) -> DisplayInfo {
        phone_display(dest)
    }
}

#[async_trait]
impl MessageSender for Voice {
    async fn send(&self, payload: &NotificationPayload) -> Result<SentMessage, KlaxonError> {
        let to = phone_from(payload)?;
        let script = render::render_voice(&self.cfg, payload)?;
        let twiml = format!("<Response><Say>{}</Say></Response>", xml_escape(&script));

        twilio_post(
            &self.http,
            &self.cfg,
            "Calls",
            &[
                ("To", to.as_str()),
                ("From", self.cfg.twilio.from_number.as_str()),
                ("Twiml", twiml.as_str()),
            ],
        )
        .await
    }
}

/// SMS provider.
///
/// Holds an optional Gupshup client; when the backend is enabled in
/// configuration, every SMS is delegated there instead of the Twilio
/// Messages API.
pub struct Sms {
    cfg: KlaxonConfig,
    http: reqwest::Client,
    gupshup: Option<klaxon_gupshup::Client>,
}

impl Sms {
    pub fn new(cfg: &KlaxonConfig) -> Self {
        Self::with_http_client(cfg, reqwest::Client::new())
    }

    pub fn with_http_client(cfg: &KlaxonConfig, http: reqwest::Client) -> Self {
        let gupshup = cfg
            .gupshup
            .enable
            .then(|| klaxon_gupshup::Client::with_http_client(&cfg.gupshup, http.clone()));
        Self {
            cfg: cfg.clone(),
            http,
            gupshup,
        }
    }

    async fn send_via_gupshup(
        &self,
        client: &klaxon_gupshup::Client,
        to: &str,
        body: &str,
    ) -> SentMessage {
        match client.send_sms(to, body).await {
            Ok(id) if id.is_empty() => SentMessage::sent(),
            Ok(id) => SentMessage::sent_with_id(id),
            Err(err) => {
                warn!(error = %err, "gupshup send failed");
                if err.is_temporary() {
                    SentMessage::failed_temp(err.to_string())
                } else {
                    SentMessage::failed_perm(err.to_string())
                }
            }
        }
    }
}

impl Provider for Sms {
    fn dest_type(&self) -> DestType {
        DEST_TYPE_TWILIO_SMS.into()
    }

    fn type_info(&self) -> TypeInfo {
        TypeInfo {
            dest_type: self.dest_type(),
            name: "Text Message (SMS)",
            enabled: self.cfg.twilio.enable && !self.cfg.twilio.disable_sms_contact_method,
            supports_alert_notifications: true,
            supports_status_updates: true,
            supports_user_verification: true,
        }
    }
}

impl DestValidator for Sms {
    fn validate_field(&self, field: &str, value: &str) -> Result<(), KlaxonError> {
        validate_phone_field(field, value)
    }
}

impl DestDisplayer for Sms {
    fn display_info(&self, dest: &Destination) -> DisplayInfo {
        phone_display(dest)
    }
}

#[async_trait]
impl MessageSender for Sms {
    async fn send(&self, payload: &NotificationPayload) -> Result<SentMessage, KlaxonError> {
        let to = phone_from(payload)?;
        let body = render::render_sms(&self.cfg, payload)?;

        if let Some(client) = &self.gupshup {
            debug!(to = to.as_str(), "routing SMS through gupshup backend");
            return Ok(self.send_via_gupshup(client, &to, &body).await);
        }

        twilio_post(
            &self.http,
            &self.cfg,
            "Messages",
            &[
                ("To", to.as_str()),
                ("From", self.cfg.twilio.from_number.as_str()),
                ("Body", body.as_str()),
            ],
        )
        .await
    }
}
