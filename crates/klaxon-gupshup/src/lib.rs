// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gupshup SMS backend client.
//!
//! Sends single SMS messages through the Gupshup enterprise API: a
//! form-encoded POST judged purely by HTTP status class, with the provider
//! message id extracted best-effort from either of two known JSON response
//! shapes. An absent message id is not an error.

use reqwest::header;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use klaxon_config::model::GupshupConfig;

const DEFAULT_BASE_URL: &str = "https://api.gupshup.io/sm/api/v1/msg";

/// Errors from the Gupshup backend, split so callers can classify the
/// failure as temporary (transport) or permanent (rejected request).
#[derive(Debug, Error)]
pub enum GupshupError {
    /// The request never completed (connect failure, timeout, cancellation).
    #[error("send gupshup request: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered outside the 2xx class.
    #[error("gupshup request failed: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The form body could not be encoded.
    #[error("build gupshup request: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

impl GupshupError {
    /// True when the external scheduler may retry the send.
    pub fn is_temporary(&self) -> bool {
        match self {
            GupshupError::Transport(_) => true,
            GupshupError::Status { status, .. } => status.is_server_error(),
            GupshupError::Encode(_) => false,
        }
    }
}

/// Client for the Gupshup SMS API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
    source: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client from the Gupshup configuration section.
    pub fn new(config: &GupshupConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Creates a client with an explicit HTTP client (timeouts, test hooks).
    pub fn with_http_client(config: &GupshupConfig, http: reqwest::Client) -> Self {
        let base_url = config.base_url.trim();
        Self {
            base_url: if base_url.is_empty() {
                DEFAULT_BASE_URL.to_string()
            } else {
                base_url.to_string()
            },
            api_key: config.api_key.clone(),
            source: config.source.clone(),
            http,
        }
    }

    /// Sends a single SMS and returns the provider message id when the
    /// response carries one; an empty id is a legitimate success.
    pub async fn send_sms(
        &self,
        destination: &str,
        message: &str,
    ) -> Result<String, GupshupError> {
        let body = serde_urlencoded::to_string([
            ("channel", "SMS"),
            ("source", self.source.as_str()),
            ("destination", destination),
            ("message", message),
        ])?;

        let mut req = self
            .http
            .post(&self.base_url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);
        if !self.api_key.is_empty() {
            req = req.header("apikey", &self.api_key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(GupshupError::Status {
                status,
                body: body.trim().to_string(),
            });
        }

        let id = extract_message_id(&body);
        debug!(destination, message_id = id.as_str(), "gupshup send accepted");
        Ok(id)
    }
}

/// Pulls the provider message id out of a response body.
///
/// Two shapes are known: a top-level `messageId`, and a nested
/// `response.msgId` / `response.messageId`. Anything else yields an empty
/// id, not an error.
fn extract_message_id(body: &str) -> String {
    let Ok(data) = serde_json::from_str::<Value>(body) else {
        return String::new();
    };

    if let Some(id) = non_empty_str(&data, "messageId") {
        return id;
    }
    if let Some(resp) = data.get("response") {
        if let Some(id) = non_empty_str(resp, "msgId") {
            return id;
        }
        if let Some(id) = non_empty_str(resp, "messageId") {
            return id;
        }
    }

    String::new()
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    let s = value.get(key)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
