// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-message dispatch pipeline.
//!
//! For each pending message the dispatcher resolves the referenced entities
//! into a channel-agnostic payload, applies the high-priority voice policy,
//! hands the payload to the notification manager, and records first-delivery
//! status for alerts. Dispatching a single message is sequential; separate
//! messages may be dispatched concurrently through the same dispatcher.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use klaxon_config::KlaxonConfig;
use klaxon_core::KlaxonError;
use klaxon_core::traits::{
    AlertLogStore, AlertStore, ContactMethodStore, DeliveryTracker, OnCallStore, ScheduleStore,
    SignalParamStore, VerificationStore,
};
use klaxon_core::types::{
    AlertLogEvent, AlertState, Message, MessageType, NotificationPayload, OnCallUser, SendResult,
};

use crate::manager::NotificationManager;
use crate::priority::apply_high_priority_override;

/// Orchestrates payload building, provider dispatch, and delivery tracking.
pub struct Dispatcher {
    contact_methods: Arc<dyn ContactMethodStore>,
    alerts: Arc<dyn AlertStore>,
    alert_logs: Arc<dyn AlertLogStore>,
    schedules: Arc<dyn ScheduleStore>,
    on_call: Arc<dyn OnCallStore>,
    verification: Arc<dyn VerificationStore>,
    signal_params: Arc<dyn SignalParamStore>,
    tracker: Arc<dyn DeliveryTracker>,
    manager: NotificationManager,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        contact_methods: Arc<dyn ContactMethodStore>,
        alerts: Arc<dyn AlertStore>,
        alert_logs: Arc<dyn AlertLogStore>,
        schedules: Arc<dyn ScheduleStore>,
        on_call: Arc<dyn OnCallStore>,
        verification: Arc<dyn VerificationStore>,
        signal_params: Arc<dyn SignalParamStore>,
        tracker: Arc<dyn DeliveryTracker>,
        manager: NotificationManager,
    ) -> Self {
        Self {
            contact_methods,
            alerts,
            alert_logs,
            schedules,
            on_call,
            verification,
            signal_params,
            tracker,
            manager,
        }
    }

    /// Dispatches one message: builds its payload, sends it through the
    /// provider layer, and records first-delivery status for alerts.
    ///
    /// The message may be mutated in memory (its destination promoted by the
    /// priority policy); configuration is an explicit snapshot argument. A
    /// terminal result is returned even for provider-level failures; `Err` is
    /// reserved for lookup and configuration problems the caller may retry.
    pub async fn send_message(
        &self,
        cfg: &KlaxonConfig,
        msg: &mut Message,
    ) -> Result<SendResult, KlaxonError> {
        debug!(
            message_id = msg.id.as_str(),
            message_type = %msg.message_type,
            dest_type = %msg.dest.dest_type(),
            "start processing message"
        );

        let mut is_first_alert_message = false;
        let payload = match msg.message_type {
            MessageType::AlertBundle => {
                let service_id = required(msg.service_id.clone(), "alert bundle", "service id")?;
                let (service_name, count) = self
                    .alerts
                    .service_info(&service_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup service info", e))?;
                if count == 0 {
                    // already acked/closed, don't send bundled notification
                    info!(
                        service_id = service_id.as_str(),
                        "bundle resolved to zero alerts; skipping send"
                    );
                    return Ok(SendResult::failed_perm(
                        &msg.id,
                        "alerts acked/closed before message sent",
                    ));
                }
                NotificationPayload::AlertBundle {
                    base: msg.base(),
                    service_id,
                    service_name,
                    count,
                }
            }
            MessageType::Alert => {
                let alert_id = required(msg.alert_id, "alert", "alert id")?;
                let service_id = required(msg.service_id.clone(), "alert", "service id")?;
                let (service_name, _) = self
                    .alerts
                    .service_info(&service_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup service info", e))?;
                let alert = self
                    .alerts
                    .find_one(alert_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup alert", e))?;
                let meta = self
                    .alerts
                    .metadata(alert_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup alert metadata", e))?;
                debug!(keys = meta.len(), "fetched alert metadata");

                let suppress = apply_high_priority_override(
                    msg,
                    &meta,
                    &cfg.alerts.high_priority_label_key,
                    &cfg.alerts.high_priority_label_value,
                    self.contact_methods.as_ref(),
                )
                .await;
                if suppress {
                    info!(message_id = msg.id.as_str(), "voice notification suppressed");
                    return Ok(SendResult::failed_perm(
                        &msg.id,
                        "voice notification suppressed for non-priority alert",
                    ));
                }

                let mut original = self
                    .tracker
                    .original_status(alert_id, &msg.dest_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup original message", e))?;
                // A message is never its own original; clear the self-reference.
                if original.as_ref().is_some_and(|r| r.message_id == msg.id) {
                    original = None;
                }
                is_first_alert_message = original.is_none();

                NotificationPayload::Alert {
                    base: msg.base(),
                    alert_id,
                    summary: alert.summary,
                    details: alert.details,
                    service_id: alert.service_id,
                    service_name,
                    meta,
                    original,
                }
            }
            MessageType::AlertStatus => {
                let log_id = required(msg.alert_log_id, "alert status", "log entry id")?;
                let alert_id = required(msg.alert_id, "alert status", "alert id")?;
                let entry = self
                    .alert_logs
                    .find_one(log_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup alert log entry", e))?;
                let alert = self
                    .alerts
                    .find_one(alert_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup original alert", e))?;
                let original = self
                    .tracker
                    .original_status(alert_id, &msg.dest_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup original message", e))?
                    .ok_or(KlaxonError::OriginalNotFound {
                        alert_id,
                        dest_id: msg.dest_id,
                    })?;

                let new_state = match entry.event {
                    AlertLogEvent::Acknowledged => AlertState::Acknowledged,
                    AlertLogEvent::Escalated => AlertState::Unacknowledged,
                    AlertLogEvent::Closed => AlertState::Closed,
                    AlertLogEvent::NotificationSent => {
                        return Err(KlaxonError::Internal(format!(
                            "log entry {log_id} of kind {} cannot drive a status update",
                            entry.event
                        )));
                    }
                };

                NotificationPayload::AlertStatus {
                    base: msg.base(),
                    alert_id: entry.alert_id,
                    service_id: alert.service_id,
                    log_entry: entry.text,
                    summary: alert.summary,
                    details: alert.details,
                    new_state,
                    original,
                }
            }
            MessageType::Test => NotificationPayload::Test { base: msg.base() },
            MessageType::Verification => {
                let verify_id = required(msg.verify_id, "verification", "verification id")?;
                let code = self
                    .verification
                    .code(verify_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup verification code", e))?;
                NotificationPayload::Verification {
                    base: msg.base(),
                    code: format!("{code:06}"),
                }
            }
            MessageType::ScheduleOnCallUsers => {
                let schedule_id = required(msg.schedule_id, "on-call roster", "schedule id")?;
                let users = self
                    .on_call
                    .on_call_users_by_schedule(schedule_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup on call users by schedule", e))?;
                let schedule = self
                    .schedules
                    .find_one(schedule_id)
                    .await
                    .map_err(|e| KlaxonError::lookup("lookup schedule by id", e))?;

                let users = users
                    .into_iter()
                    .map(|u| {
                        let url = cfg.callback_url(&format!("/users/{}", u.id));
                        OnCallUser {
                            id: u.id,
                            name: u.name,
                            url,
                        }
                    })
                    .collect();

                NotificationPayload::ScheduleOnCallUsers {
                    base: msg.base(),
                    schedule_id,
                    schedule_name: schedule.name,
                    schedule_url: cfg.callback_url(&format!("/schedules/{schedule_id}")),
                    users,
                }
            }
            MessageType::SignalMessage => {
                let id = Uuid::parse_str(&msg.id)
                    .map_err(|e| KlaxonError::lookup("parse signal message id", e))?;
                let params = self
                    .signal_params
                    .params(id)
                    .await
                    .map_err(|e| KlaxonError::lookup("get signal message params", e))?;
                NotificationPayload::Signal {
                    base: msg.base(),
                    params,
                }
            }
        };

        debug!(dest_type = %payload.dest_type(), "dispatching via notification manager");
        let res = self.manager.send(&payload).await?;
        debug!(state = %res.state, details = res.details.as_str(), "provider result");

        if is_first_alert_message && res.state.is_ok() {
            if let Some(alert_id) = msg.alert_id {
                debug!(alert_id, dest = %msg.dest, "tracking first delivery");
                if let Err(err) = self.tracker.record(&msg.dest_id, alert_id, &msg.id).await {
                    // non-fatal, but status updates will not work for that
                    // alert/destination
                    warn!(
                        alert_id,
                        dest = %msg.dest,
                        error = %err,
                        "track status updates failed"
                    );
                }
            }
        }

        Ok(res)
    }
}

fn required<T>(
    value: Option<T>,
    message_kind: &str,
    field: &str,
) -> Result<T, KlaxonError> {
    value.ok_or_else(|| {
        KlaxonError::Internal(format!("{message_kind} message is missing its {field}"))
    })
}
