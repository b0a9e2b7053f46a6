// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! High-priority voice override.
//!
//! Voice is the most intrusive channel and is reserved for alerts that carry
//! an explicit priority marker in their metadata. Alerts tagged high priority
//! are promoted to the user's voice contact method when one exists; untagged
//! alerts targeting voice are suppressed instead.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use klaxon_core::traits::ContactMethodStore;
use klaxon_core::types::{DestId, Message};
use klaxon_twilio::DEST_TYPE_TWILIO_VOICE;

/// Applies the high-priority override to an outgoing alert message, promoting
/// its destination in place when warranted. Returns `true` when the current
/// notification should be suppressed (a non-priority alert targeting voice).
///
/// The policy is disabled entirely while either label half is empty, and it
/// is idempotent: re-applying to an already-promoted message is a no-op.
pub async fn apply_high_priority_override(
    msg: &mut Message,
    meta: &HashMap<String, String>,
    key: &str,
    value: &str,
    contact_methods: &dyn ContactMethodStore,
) -> bool {
    if key.is_empty() || value.is_empty() {
        return false;
    }

    let is_high = meta.get(key).is_some_and(|v| v == value);
    debug!(
        key,
        found = meta.get(key).map(String::as_str).unwrap_or(""),
        required = value,
        "evaluating high-priority override"
    );

    if is_high {
        if msg.dest.dest_type().as_str() == DEST_TYPE_TWILIO_VOICE {
            debug!("already targeting voice; no change");
            return false;
        }

        let Some(user_id) = msg.user_id.as_deref() else {
            debug!("message has no owning user; keep existing destination");
            return false;
        };

        let cms = match contact_methods.find_all(user_id).await {
            Ok(cms) => cms,
            Err(err) => {
                warn!(error = %err, "lookup contact methods for high priority alert");
                return false;
            }
        };

        for cm in cms {
            if cm.dest.dest_type().as_str() != DEST_TYPE_TWILIO_VOICE {
                continue;
            }
            info!(contact_method = %cm.id, "promoted to voice contact method");
            msg.dest = cm.dest;
            msg.dest_id = DestId::ContactMethod(cm.id);
            return false;
        }

        debug!("no voice contact method found; keep existing destination");
        return false;
    }

    // Not high priority: voice stays quiet, everything else goes out normally.
    if msg.dest.dest_type().as_str() == DEST_TYPE_TWILIO_VOICE {
        info!(user_id = msg.user_id.as_deref().unwrap_or(""), "suppressing voice notification for non-priority alert");
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use klaxon_core::types::{ContactMethod, Destination, MessageType};
    use klaxon_core::KlaxonError;
    use klaxon_twilio::{sms_dest, voice_dest, DEST_TYPE_TWILIO_SMS};
    use uuid::Uuid;

    struct StubContactMethods {
        cms: Vec<ContactMethod>,
    }

    #[async_trait]
    impl ContactMethodStore for StubContactMethods {
        async fn find_all(&self, _user_id: &str) -> Result<Vec<ContactMethod>, KlaxonError> {
            Ok(self.cms.clone())
        }
    }

    fn alert_message(dest_id: DestId, dest: Destination) -> Message {
        Message {
            id: "msg-1".into(),
            message_type: MessageType::Alert,
            dest_id,
            dest,
            user_id: Some("u1".into()),
            service_id: Some("svc".into()),
            alert_id: Some(1),
            alert_status: None,
            alert_log_id: None,
            schedule_id: None,
            verify_id: None,
            sent_at: None,
        }
    }

    fn store_with_voice_and_sms(voice_id: Uuid, sms_id: Uuid) -> StubContactMethods {
        StubContactMethods {
            cms: vec![
                ContactMethod {
                    id: voice_id,
                    user_id: "u1".into(),
                    dest: voice_dest("+15555550123"),
                },
                ContactMethod {
                    id: sms_id,
                    user_id: "u1".into(),
                    dest: sms_dest("+15555550123"),
                },
            ],
        }
    }

    fn high_meta() -> HashMap<String, String> {
        HashMap::from([("alerts/priority".to_string(), "high".to_string())])
    }

    #[tokio::test]
    async fn empty_label_pair_disables_the_policy() {
        let voice_id = Uuid::new_v4();
        let store = StubContactMethods { cms: vec![] };
        let mut msg = alert_message(DestId::ContactMethod(voice_id), voice_dest("+15555550123"));

        let suppress =
            apply_high_priority_override(&mut msg, &high_meta(), "", "", &store).await;
        assert!(!suppress);
        assert_eq!(msg.dest.dest_type().as_str(), DEST_TYPE_TWILIO_VOICE);
    }

    #[tokio::test]
    async fn high_priority_promotes_sms_to_voice() {
        let voice_id = Uuid::new_v4();
        let sms_id = Uuid::new_v4();
        let store = store_with_voice_and_sms(voice_id, sms_id);
        let mut msg = alert_message(DestId::ContactMethod(sms_id), sms_dest("+15555550123"));

        let suppress = apply_high_priority_override(
            &mut msg,
            &high_meta(),
            "alerts/priority",
            "high",
            &store,
        )
        .await;

        assert!(!suppress);
        assert_eq!(msg.dest.dest_type().as_str(), DEST_TYPE_TWILIO_VOICE);
        assert_eq!(msg.dest_id, DestId::ContactMethod(voice_id));
    }

    #[tokio::test]
    async fn high_priority_voice_destination_is_untouched() {
        let voice_id = Uuid::new_v4();
        let store = store_with_voice_and_sms(voice_id, Uuid::new_v4());
        let mut msg = alert_message(DestId::ContactMethod(voice_id), voice_dest("+15555550123"));

        let suppress = apply_high_priority_override(
            &mut msg,
            &high_meta(),
            "alerts/priority",
            "high",
            &store,
        )
        .await;

        assert!(!suppress);
        assert_eq!(msg.dest_id, DestId::ContactMethod(voice_id));
    }

    #[tokio::test]
    async fn high_priority_without_voice_contact_method_keeps_destination() {
        let sms_id = Uuid::new_v4();
        let store = StubContactMethods {
            cms: vec![ContactMethod {
                id: sms_id,
                user_id: "u1".into(),
                dest: sms_dest("+15555550123"),
            }],
        };
        let mut msg = alert_message(DestId::ContactMethod(sms_id), sms_dest("+15555550123"));

        let suppress = apply_high_priority_override(
            &mut msg,
            &high_meta(),
            "alerts/priority",
            "high",
            &store,
        )
        .await;

        assert!(!suppress);
        assert_eq!(msg.dest.dest_type().as_str(), DEST_TYPE_TWILIO_SMS);
        assert_eq!(msg.dest_id, DestId::ContactMethod(sms_id));
    }

    #[tokio::test]
    async fn non_priority_alert_suppresses_voice() {
        let voice_id = Uuid::new_v4();
        let store = store_with_voice_and_sms(voice_id, Uuid::new_v4());
        let mut msg = alert_message(DestId::ContactMethod(voice_id), voice_dest("+15555550123"));
        let meta = HashMap::from([("other".to_string(), "val".to_string())]);

        let suppress =
            apply_high_priority_override(&mut msg, &meta, "alerts/priority", "high", &store)
                .await;

        assert!(suppress);
        assert_eq!(msg.dest_id, DestId::ContactMethod(voice_id));
    }

    #[tokio::test]
    async fn non_priority_sms_is_delivered_normally() {
        let sms_id = Uuid::new_v4();
        let store = store_with_voice_and_sms(Uuid::new_v4(), sms_id);
        let mut msg = alert_message(DestId::ContactMethod(sms_id), sms_dest("+15555550123"));

        let suppress = apply_high_priority_override(
            &mut msg,
            &HashMap::new(),
            "alerts/priority",
            "high",
            &store,
        )
        .await;

        assert!(!suppress);
        assert_eq!(msg.dest_id, DestId::ContactMethod(sms_id));
    }
}
