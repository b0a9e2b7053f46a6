// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the dispatch engine and the notification providers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Outgoing message category.
///
/// Drives both the payload shape and the dispatch control flow; adding a
/// variant is a compile-checked exhaustiveness requirement on the router.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum MessageType {
    Alert,
    AlertBundle,
    AlertStatus,
    Test,
    Verification,
    ScheduleOnCallUsers,
    SignalMessage,
}

/// Lifecycle state of an alert.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum AlertState {
    #[default]
    Unacknowledged,
    Acknowledged,
    Closed,
}

/// Stable identifier for a destination type (e.g. `builtin-twilio-voice`).
///
/// Provider crates export their tags as constants; the notification manager
/// uses the tag as its registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestType(String);

impl DestType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DestType {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DestType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for DestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A delivery destination: channel type plus named string arguments.
///
/// Immutable once constructed; promotion replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    dest_type: DestType,
    args: BTreeMap<String, String>,
}

impl Destination {
    /// Builds a destination from a type tag and named field/value pairs.
    pub fn new(dest_type: impl Into<DestType>, args: &[(&str, &str)]) -> Self {
        Self {
            dest_type: dest_type.into(),
            args: args
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    pub fn dest_type(&self) -> &DestType {
        &self.dest_type
    }

    /// Looks up a single named argument.
    pub fn arg(&self, field: &str) -> Option<&str> {
        self.args.get(field).map(String::as_str)
    }

    pub fn args(&self) -> &BTreeMap<String, String> {
        &self.args
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dest_type)?;
        for (k, v) in &self.args {
            write!(f, " {k}={v}")?;
        }
        Ok(())
    }
}

/// Identifies where a message is addressed: a user's contact method or a
/// shared notification channel. Exactly one of the two, by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestId {
    ContactMethod(Uuid),
    Channel(Uuid),
}

impl DestId {
    pub fn is_user_contact_method(&self) -> bool {
        matches!(self, DestId::ContactMethod(_))
    }

    pub fn uuid(&self) -> Uuid {
        match self {
            DestId::ContactMethod(id) | DestId::Channel(id) => *id,
        }
    }
}

impl fmt::Display for DestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestId::ContactMethod(id) => write!(f, "cm:{id}"),
            DestId::Channel(id) => write!(f, "chan:{id}"),
        }
    }
}

/// A unit of outbound notification work, produced by the scheduler.
///
/// Mutated by the dispatch pipeline only in memory during a single send
/// attempt (the destination may be promoted); `sent_at` is stamped by the
/// persistence layer after a terminal provider result.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub message_type: MessageType,
    pub dest_id: DestId,
    pub dest: Destination,
    pub user_id: Option<String>,
    pub service_id: Option<String>,
    pub alert_id: Option<i64>,
    /// Alert lifecycle snapshot taken when the message was scheduled.
    pub alert_status: Option<AlertState>,
    pub alert_log_id: Option<i64>,
    pub schedule_id: Option<Uuid>,
    pub verify_id: Option<Uuid>,
    /// `None` until the message has actually been sent.
    pub sent_at: Option<DateTime<Utc>>,
}

impl Message {
    /// The identity portion every payload variant carries.
    pub fn base(&self) -> PayloadBase {
        PayloadBase {
            message_id: self.id.clone(),
            dest_id: self.dest_id,
            dest: self.dest.clone(),
        }
    }
}

/// A user's registered destination. Read-only to the dispatch engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMethod {
    pub id: Uuid,
    pub user_id: String,
    pub dest: Destination,
}

/// The first delivery recorded for an (alert, destination) pair.
///
/// Later status-update messages reference it; at most one record exists per
/// pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub message_id: String,
    pub alert_id: i64,
    pub dest_id: DestId,
}

/// Identity shared by every payload variant: the message being delivered and
/// where it goes.
#[derive(Debug, Clone)]
pub struct PayloadBase {
    pub message_id: String,
    pub dest_id: DestId,
    pub dest: Destination,
}

/// One on-call user entry in a schedule roster payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnCallUser {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Channel-agnostic rendering of a message, resolved from domain entities.
///
/// Built fresh per send attempt; never persisted.
#[derive(Debug, Clone)]
pub enum NotificationPayload {
    Alert {
        base: PayloadBase,
        alert_id: i64,
        summary: String,
        details: String,
        service_id: String,
        service_name: String,
        meta: HashMap<String, String>,
        /// The original delivery for this alert/destination pair, if this
        /// message is not itself the original.
        original: Option<DeliveryRecord>,
    },
    AlertBundle {
        base: PayloadBase,
        service_id: String,
        service_name: String,
        count: u64,
    },
    AlertStatus {
        base: PayloadBase,
        alert_id: i64,
        service_id: String,
        log_entry: String,
        summary: String,
        details: String,
        new_state: AlertState,
        original: DeliveryRecord,
    },
    Test {
        base: PayloadBase,
    },
    Verification {
        base: PayloadBase,
        /// Zero-padded six-digit code.
        code: String,
    },
    ScheduleOnCallUsers {
        base: PayloadBase,
        schedule_id: Uuid,
        schedule_name: String,
        schedule_url: String,
        users: Vec<OnCallUser>,
    },
    Signal {
        base: PayloadBase,
        params: HashMap<String, String>,
    },
}

impl NotificationPayload {
    pub fn base(&self) -> &PayloadBase {
        match self {
            NotificationPayload::Alert { base, .. }
            | NotificationPayload::AlertBundle { base, .. }
            | NotificationPayload::AlertStatus { base, .. }
            | NotificationPayload::Test { base }
            | NotificationPayload::Verification { base, .. }
            | NotificationPayload::ScheduleOnCallUsers { base, .. }
            | NotificationPayload::Signal { base, .. } => base,
        }
    }

    /// The destination type this payload will be routed by.
    pub fn dest_type(&self) -> &DestType {
        self.base().dest.dest_type()
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            NotificationPayload::Alert { .. } => MessageType::Alert,
            NotificationPayload::AlertBundle { .. } => MessageType::AlertBundle,
            NotificationPayload::AlertStatus { .. } => MessageType::AlertStatus,
            NotificationPayload::Test { .. } => MessageType::Test,
            NotificationPayload::Verification { .. } => MessageType::Verification,
            NotificationPayload::ScheduleOnCallUsers { .. } => MessageType::ScheduleOnCallUsers,
            NotificationPayload::Signal { .. } => MessageType::SignalMessage,
        }
    }
}

/// Terminal state of a single delivery attempt.
///
/// Temporary failures are retried by the external scheduler, never by the
/// dispatch engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum SendState {
    Sent,
    FailedTemp,
    FailedPerm,
}

impl SendState {
    pub fn is_ok(&self) -> bool {
        matches!(self, SendState::Sent)
    }
}

/// Provider-side outcome of a send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub state: SendState,
    /// Human-readable detail; may be empty.
    pub details: String,
    /// External provider message id, when the backend reports one.
    pub external_id: Option<String>,
}

impl SentMessage {
    pub fn sent() -> Self {
        Self {
            state: SendState::Sent,
            details: String::new(),
            external_id: None,
        }
    }

    pub fn sent_with_id(external_id: impl Into<String>) -> Self {
        Self {
            state: SendState::Sent,
            details: String::new(),
            external_id: Some(external_id.into()),
        }
    }

    pub fn failed_perm(details: impl Into<String>) -> Self {
        Self {
            state: SendState::FailedPerm,
            details: details.into(),
            external_id: None,
        }
    }

    pub fn failed_temp(details: impl Into<String>) -> Self {
        Self {
            state: SendState::FailedTemp,
            details: details.into(),
            external_id: None,
        }
    }
}

/// Outcome of dispatching one message, surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub message_id: String,
    pub state: SendState,
    pub details: String,
    pub external_id: Option<String>,
}

impl SendResult {
    pub fn from_sent(message_id: impl Into<String>, sent: SentMessage) -> Self {
        Self {
            message_id: message_id.into(),
            state: sent.state,
            details: sent.details,
            external_id: sent.external_id,
        }
    }

    pub fn failed_perm(message_id: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            state: SendState::FailedPerm,
            details: details.into(),
            external_id: None,
        }
    }
}

/// An alert as resolved from the alert store.
#[derive(Debug, Clone)]
pub struct Alert {
    pub id: i64,
    pub summary: String,
    pub details: String,
    pub service_id: String,
    pub status: AlertState,
}

/// Kind of an alert log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum AlertLogEvent {
    Acknowledged,
    Escalated,
    Closed,
    NotificationSent,
}

/// A single entry from the alert log store.
#[derive(Debug, Clone)]
pub struct AlertLogEntry {
    pub id: i64,
    pub alert_id: i64,
    pub event: AlertLogEvent,
    /// Rendered human-readable form of the entry.
    pub text: String,
}

/// An on-call schedule as resolved from the schedule store.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub id: Uuid,
    pub name: String,
}

/// A user as resolved from the on-call store.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// A user currently on call for a service, with their escalation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOnCallUser {
    pub user_id: String,
    pub step_number: i32,
}

/// Subscription keys stored alongside a browser push endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub auth: String,
    pub p256dh: String,
}

/// A browser push registration stored for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

impl PushSubscription {
    /// True when every field required for delivery is present.
    pub fn is_complete(&self) -> bool {
        !self.endpoint.is_empty() && !self.keys.auth.is_empty() && !self.keys.p256dh.is_empty()
    }
}

/// Display metadata and enablement for a destination type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub dest_type: DestType,
    pub name: &'static str,
    pub enabled: bool,
    pub supports_alert_notifications: bool,
    pub supports_status_updates: bool,
    pub supports_user_verification: bool,
}

/// Human-readable summary of a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn message_type_round_trips_through_strings() {
        let variants = [
            MessageType::Alert,
            MessageType::AlertBundle,
            MessageType::AlertStatus,
            MessageType::Test,
            MessageType::Verification,
            MessageType::ScheduleOnCallUsers,
            MessageType::SignalMessage,
        ];
        for variant in variants {
            let parsed = MessageType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn destination_args_are_ordered_and_named() {
        let dest = Destination::new("builtin-webpush", &[
            ("endpoint", "https://push.example/abc"),
            ("auth", "a"),
            ("p256dh", "p"),
        ]);
        assert_eq!(dest.arg("endpoint"), Some("https://push.example/abc"));
        assert_eq!(dest.arg("missing"), None);
        let keys: Vec<&str> = dest.args().keys().map(String::as_str).collect();
        assert_eq!(keys, ["auth", "endpoint", "p256dh"]);
    }

    #[test]
    fn dest_id_is_exactly_one_of_cm_or_channel() {
        let cm = DestId::ContactMethod(Uuid::nil());
        let chan = DestId::Channel(Uuid::nil());
        assert!(cm.is_user_contact_method());
        assert!(!chan.is_user_contact_method());
        assert!(cm.to_string().starts_with("cm:"));
        assert!(chan.to_string().starts_with("chan:"));
    }

    #[test]
    fn payload_reports_its_message_type() {
        let base = PayloadBase {
            message_id: "m1".into(),
            dest_id: DestId::ContactMethod(Uuid::nil()),
            dest: Destination::new("builtin-twilio-sms", &[("phone_number", "+15555550123")]),
        };
        let payload = NotificationPayload::Verification {
            base,
            code: "000042".into(),
        };
        assert_eq!(payload.message_type(), MessageType::Verification);
        assert_eq!(payload.dest_type().as_str(), "builtin-twilio-sms");
    }

    #[test]
    fn send_state_ok_only_for_sent() {
        assert!(SendState::Sent.is_ok());
        assert!(!SendState::FailedTemp.is_ok());
        assert!(!SendState::FailedPerm.is_ok());
    }

    #[test]
    fn incomplete_subscription_is_detected() {
        let sub = PushSubscription {
            endpoint: "https://push.example/x".into(),
            keys: SubscriptionKeys {
                auth: String::new(),
                p256dh: "p".into(),
            },
        };
        assert!(!sub.is_complete());
    }
}
