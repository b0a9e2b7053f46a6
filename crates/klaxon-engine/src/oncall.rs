// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-call roster helpers.

use klaxon_core::types::ServiceOnCallUser;

/// Returns only the user IDs belonging to the escalation step with the
/// lowest step number present, along with that step number (`-1` when the
/// roster is empty).
pub fn filter_primary_step_user_ids(users: &[ServiceOnCallUser]) -> (Vec<String>, i32) {
    let mut min_step = -1;
    let mut result: Vec<String> = Vec::with_capacity(users.len());

    for u in users {
        if min_step == -1 || u.step_number < min_step {
            min_step = u.step_number;
            result.clear();
        }
        if u.step_number == min_step {
            result.push(u.user_id.clone());
        }
    }

    (result, min_step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_call(user_id: &str, step_number: i32) -> ServiceOnCallUser {
        ServiceOnCallUser {
            user_id: user_id.to_string(),
            step_number,
        }
    }

    #[test]
    fn keeps_only_the_lowest_step() {
        let users = vec![
            on_call("u1", 2),
            on_call("u2", 0),
            on_call("u3", 1),
            on_call("u4", 0),
        ];
        let (ids, step) = filter_primary_step_user_ids(&users);
        assert_eq!(ids, vec!["u2", "u4"]);
        assert_eq!(step, 0);
    }

    #[test]
    fn lower_step_seen_later_resets_the_result() {
        let users = vec![on_call("u1", 3), on_call("u2", 3), on_call("u3", 1)];
        let (ids, step) = filter_primary_step_user_ids(&users);
        assert_eq!(ids, vec!["u3"]);
        assert_eq!(step, 1);
    }

    #[test]
    fn empty_roster_yields_negative_step() {
        let (ids, step) = filter_primary_step_user_ids(&[]);
        assert!(ids.is_empty());
        assert_eq!(step, -1);
    }
}
