// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Klaxon dispatch engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Klaxon configuration.
///
/// Loaded from TOML files with environment variable overrides. All sections
/// are optional and default to sensible values. The dispatch pipeline takes
/// this as an explicit immutable snapshot argument; nothing reads it
/// ambiently.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KlaxonConfig {
    /// Application identity and public URL settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Alert delivery policy settings.
    #[serde(default)]
    pub alerts: AlertsConfig,

    /// Twilio telephony settings (voice and SMS).
    #[serde(default)]
    pub twilio: TwilioConfig,

    /// Gupshup SMS backend settings.
    #[serde(default)]
    pub gupshup: GupshupConfig,

    /// Browser push settings.
    #[serde(default)]
    pub webpush: WebPushConfig,
}

impl KlaxonConfig {
    /// Joins a path onto the configured public URL.
    ///
    /// Used for user/schedule/alert links embedded in notification payloads.
    pub fn callback_url(&self, path: &str) -> String {
        let base = self.general.public_url.trim_end_matches('/');
        format!("{base}{path}")
    }
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Display name used in rendered notification text.
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Public base URL of the web UI, used to build callback links.
    #[serde(default)]
    pub public_url: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            application_name: default_application_name(),
            public_url: String::new(),
        }
    }
}

fn default_application_name() -> String {
    "Klaxon".to_string()
}

/// Alert delivery policy configuration.
///
/// The high-priority label pair gates voice delivery: alerts whose metadata
/// carries `high_priority_label_key = high_priority_label_value` are promoted
/// to voice, all others have voice suppressed. Leaving either value empty
/// disables the policy entirely.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AlertsConfig {
    #[serde(default)]
    pub high_priority_label_key: String,

    #[serde(default)]
    pub high_priority_label_value: String,
}

/// Twilio telephony configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwilioConfig {
    /// Enables the Twilio voice and SMS destination types.
    #[serde(default)]
    pub enable: bool,

    #[serde(default)]
    pub account_sid: String,

    #[serde(default)]
    pub auth_token: String,

    /// E.164 number outbound calls and messages originate from.
    #[serde(default)]
    pub from_number: String,

    /// Hides the SMS contact method from users while leaving voice enabled.
    #[serde(default)]
    pub disable_sms_contact_method: bool,

    /// API base URL, overridable for tests.
    #[serde(default = "default_twilio_base_url")]
    pub base_url: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            enable: false,
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            disable_sms_contact_method: false,
            base_url: default_twilio_base_url(),
        }
    }
}

fn default_twilio_base_url() -> String {
    "https://api.twilio.com".to_string()
}

/// Gupshup SMS backend configuration.
///
/// When enabled, SMS delivery is routed through Gupshup instead of the
/// Twilio Messages API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GupshupConfig {
    #[serde(default)]
    pub enable: bool,

    #[serde(default = "default_gupshup_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    /// Sender identifier passed as the `source` form field.
    #[serde(default)]
    pub source: String,
}

impl Default for GupshupConfig {
    fn default() -> Self {
        Self {
            enable: false,
            base_url: default_gupshup_base_url(),
            api_key: String::new(),
            source: String::new(),
        }
    }
}

fn default_gupshup_base_url() -> String {
    "https://api.gupshup.io/sm/api/v1/msg".to_string()
}

/// Browser push configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebPushConfig {
    #[serde(default)]
    pub enable: bool,

    #[serde(default)]
    pub vapid_public_key: String,

    #[serde(default)]
    pub vapid_private_key: String,

    /// Contact address reported to push services; normalized before use.
    #[serde(default)]
    pub subscriber_email: String,

    /// Delivery TTL in seconds.
    #[serde(default = "default_webpush_ttl")]
    pub ttl: u32,
}

impl Default for WebPushConfig {
    fn default() -> Self {
        Self {
            enable: false,
            vapid_public_key: String::new(),
            vapid_private_key: String::new(),
            subscriber_email: String::new(),
            ttl: default_webpush_ttl(),
        }
    }
}

fn default_webpush_ttl() -> u32 {
    60
}
