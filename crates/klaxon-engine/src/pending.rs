// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partitioning of the pending-message backlog.

use klaxon_core::types::{AlertState, Message, MessageType};

/// Splits a list of messages, returning only those unsent and matching at
/// least one of the provided types. Any sent or non-type-matching message is
/// returned in the remainder, untouched.
///
/// Alert messages whose lifecycle snapshot is already acknowledged or closed
/// are held back even when their type matches: the alert died before the
/// notification could go out.
///
/// Pure over its inputs; output order follows input order.
pub fn split_pending_by_type(
    messages: Vec<Message>,
    types: &[MessageType],
) -> (Vec<Message>, Vec<Message>) {
    let mut matching = Vec::new();
    let mut remainder = Vec::new();

    'messages: for msg in messages {
        if msg.sent_at.is_some() {
            remainder.push(msg);
            continue;
        }

        for &t in types {
            if msg.message_type != t {
                continue;
            }

            if msg.message_type == MessageType::Alert
                && matches!(
                    msg.alert_status,
                    Some(AlertState::Acknowledged | AlertState::Closed)
                )
            {
                remainder.push(msg);
                continue 'messages;
            }

            matching.push(msg);
            continue 'messages;
        }

        // doesn't match any requested type, keep it for a later pass
        remainder.push(msg);
    }

    (matching, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use klaxon_core::types::{DestId, Destination};
    use uuid::Uuid;

    fn msg(message_type: MessageType) -> Message {
        Message {
            id: Uuid::new_v4().to_string(),
            message_type,
            dest_id: DestId::ContactMethod(Uuid::new_v4()),
            dest: Destination::new("builtin-twilio-sms", &[("phone_number", "+15555550123")]),
            user_id: None,
            service_id: None,
            alert_id: None,
            alert_status: None,
            alert_log_id: None,
            schedule_id: None,
            verify_id: None,
            sent_at: None,
        }
    }

    fn ids(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn splits_by_requested_types_and_sent_state() {
        let mut sent_alert = msg(MessageType::Alert);
        sent_alert.sent_at = Some(Utc.timestamp_opt(1, 0).unwrap());
        let bundle = msg(MessageType::AlertBundle);
        let unsent_alert = msg(MessageType::Alert);
        let test = msg(MessageType::Test);

        let expected_matching = vec![bundle.id.clone(), test.id.clone()];
        let expected_remainder = vec![sent_alert.id.clone(), unsent_alert.id.clone()];

        let (matching, remainder) = split_pending_by_type(
            vec![sent_alert, bundle, unsent_alert, test],
            &[MessageType::AlertBundle, MessageType::Test],
        );

        assert_eq!(ids(&matching), expected_matching);
        assert_eq!(ids(&remainder), expected_remainder);
    }

    #[test]
    fn sent_messages_never_match_even_when_type_requested() {
        let mut sent = msg(MessageType::Test);
        sent.sent_at = Some(Utc.timestamp_opt(1, 0).unwrap());

        let (matching, remainder) =
            split_pending_by_type(vec![sent], &[MessageType::Test]);
        assert!(matching.is_empty());
        assert_eq!(remainder.len(), 1);
    }

    #[test]
    fn filters_acknowledged_and_closed_alerts() {
        let mut acked = msg(MessageType::Alert);
        acked.alert_status = Some(AlertState::Acknowledged);
        let mut open = msg(MessageType::Alert);
        open.alert_status = Some(AlertState::Unacknowledged);
        let mut closed = msg(MessageType::Alert);
        closed.alert_status = Some(AlertState::Closed);

        let open_id = open.id.clone();

        let (matching, remainder) =
            split_pending_by_type(vec![acked, open, closed], &[MessageType::Alert]);

        assert_eq!(ids(&matching), vec![open_id.as_str()]);
        assert_eq!(remainder.len(), 2);
    }

    #[test]
    fn result_is_independent_of_input_order() {
        let bundle = msg(MessageType::AlertBundle);
        let alert = msg(MessageType::Alert);
        let test = msg(MessageType::Test);

        let forward = split_pending_by_type(
            vec![bundle.clone(), alert.clone(), test.clone()],
            &[MessageType::AlertBundle, MessageType::Test],
        );
        let backward = split_pending_by_type(
            vec![test, alert, bundle],
            &[MessageType::AlertBundle, MessageType::Test],
        );

        let mut forward_ids: Vec<String> =
            forward.0.iter().map(|m| m.id.clone()).collect();
        let mut backward_ids: Vec<String> =
            backward.0.iter().map(|m| m.id.clone()).collect();
        forward_ids.sort();
        backward_ids.sort();
        assert_eq!(forward_ids, backward_ids);
    }
}
