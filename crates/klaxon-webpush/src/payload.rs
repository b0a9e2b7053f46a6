// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel payload rendering for browser push.
//!
//! Each supported notification variant gets its own title/body/url shape;
//! the service worker routes on `kind`.

use serde::Serialize;

use klaxon_config::KlaxonConfig;
use klaxon_core::KlaxonError;
use klaxon_core::types::NotificationPayload;

/// The JSON document delivered to a push subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// Renders a notification payload into its push document.
pub fn build_payload(
    cfg: &KlaxonConfig,
    payload: &NotificationPayload,
) -> Result<PushPayload, KlaxonError> {
    let app = &cfg.general.application_name;
    match payload {
        NotificationPayload::Alert {
            alert_id,
            summary,
            service_name,
            ..
        } => {
            let body = summary.trim();
            Ok(PushPayload {
                kind: "alert".into(),
                title: format!("Alert #{alert_id} · {service_name}"),
                body: if body.is_empty() {
                    format!("Alert #{alert_id} is active.")
                } else {
                    body.to_string()
                },
                url: format!("/alerts/{alert_id}"),
            })
        }
        NotificationPayload::AlertBundle {
            service_id,
            service_name,
            count,
            ..
        } => Ok(PushPayload {
            kind: "alert-bundle".into(),
            title: format!("{service_name} Alerts"),
            body: format!("{count} unacknowledged alerts"),
            url: format!("/services/{service_id}/alerts"),
        }),
        NotificationPayload::AlertStatus {
            alert_id,
            log_entry,
            ..
        } => {
            let body = log_entry.trim();
            Ok(PushPayload {
                kind: "alert-status".into(),
                title: format!("Alert #{alert_id} update"),
                body: if body.is_empty() {
                    format!("Alert #{alert_id} status updated.")
                } else {
                    body.to_string()
                },
                url: format!("/alerts/{alert_id}"),
            })
        }
        NotificationPayload::Test { .. } => Ok(PushPayload {
            kind: "test".into(),
            title: format!("{app} Test Message"),
            body: "This is a test notification.".into(),
            url: "/profile".into(),
        }),
        NotificationPayload::Verification { code, .. } => Ok(PushPayload {
            kind: "verification".into(),
            title: format!("{app} Verification Code"),
            body: format!("Enter code {code} to verify this device."),
            url: "/profile".into(),
        }),
        NotificationPayload::ScheduleOnCallUsers { .. } | NotificationPayload::Signal { .. } => {
            Err(KlaxonError::provider(format!(
                "web push does not support {} messages",
                payload.message_type()
            )))
        }
    }
}
