// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text rendering of notification payloads for telephony delivery.
//!
//! SMS bodies carry the application name, the essential fact, and a callback
//! link; voice scripts are the spoken equivalent without URLs.

use klaxon_config::KlaxonConfig;
use klaxon_core::types::{AlertState, NotificationPayload};
use klaxon_core::KlaxonError;

/// Renders a payload as an SMS body.
pub(crate) fn render_sms(
    cfg: &KlaxonConfig,
    payload: &NotificationPayload,
) -> Result<String, KlaxonError> {
    let app = &cfg.general.application_name;
    match payload {
        NotificationPayload::Alert {
            alert_id, summary, ..
        } => Ok(format!(
            "{app}: Alert #{alert_id}: {summary}\n\n{}",
            cfg.callback_url(&format!("/alerts/{alert_id}"))
        )),
        NotificationPayload::AlertBundle {
            service_id,
            service_name,
            count,
            ..
        } => Ok(format!(
            "{app}: Service '{service_name}' has {count} unacknowledged alert(s)\n\n{}",
            cfg.callback_url(&format!("/services/{service_id}/alerts"))
        )),
        NotificationPayload::AlertStatus {
            alert_id,
            log_entry,
            ..
        } => Ok(format!(
            "{app}: Alert #{alert_id}: {log_entry}\n\n{}",
            cfg.callback_url(&format!("/alerts/{alert_id}"))
        )),
        NotificationPayload::Test { .. } => Ok(format!("{app}: This is a test message.")),
        NotificationPayload::Verification { code, .. } => {
            Ok(format!("{app}: Verification code: {code}"))
        }
        NotificationPayload::ScheduleOnCallUsers {
            schedule_name,
            schedule_url,
            users,
            ..
        } => {
            let roster = if users.is_empty() {
                "no one".to_string()
            } else {
                users
                    .iter()
                    .map(|u| u.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            Ok(format!(
                "{app}: On-call for schedule '{schedule_name}': {roster}\n\n{schedule_url}"
            ))
        }
        NotificationPayload::Signal { .. } => Err(KlaxonError::provider(
            "signal messages are not deliverable over SMS",
        )),
    }
}

/// Renders a payload as a spoken voice script.
pub(crate) fn render_voice(
    cfg: &KlaxonConfig,
    payload: &NotificationPayload,
) -> Result<String, KlaxonError> {
    let app = &cfg.general.application_name;
    match payload {
        NotificationPayload::Alert { summary, .. } => Ok(format!(
            "Hello. This is {app} with an alert notification. {summary}."
        )),
        NotificationPayload::AlertBundle {
            service_name,
            count,
            ..
        } => Ok(format!(
            "Hello. This is {app}. Service {service_name} has {count} unacknowledged alerts."
        )),
        NotificationPayload::AlertStatus {
            new_state,
            log_entry,
            ..
        } => Ok(format!(
            "Hello. This is {app} with a status update. The alert is now {}. {log_entry}.",
            spoken_state(*new_state)
        )),
        NotificationPayload::Test { .. } => {
            Ok(format!("Hello. This is a test call from {app}."))
        }
        NotificationPayload::Verification { code, .. } => Ok(format!(
            "Hello. This is {app}. Your verification code is: {}. Again, your code is: {}.",
            spell_digits(code),
            spell_digits(code)
        )),
        NotificationPayload::ScheduleOnCallUsers { .. } | NotificationPayload::Signal { .. } => {
            Err(KlaxonError::provider(format!(
                "{} messages are not deliverable over voice",
                payload.message_type()
            )))
        }
    }
}

fn spoken_state(state: AlertState) -> &'static str {
    match state {
        AlertState::Unacknowledged => "unacknowledged",
        AlertState::Acknowledged => "acknowledged",
        AlertState::Closed => "closed",
    }
}

/// Spaces digits out so text-to-speech reads them one at a time.
fn spell_digits(code: &str) -> String {
    code.chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
