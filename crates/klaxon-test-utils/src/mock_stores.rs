// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborator stores for deterministic testing.
//!
//! Every store holds its fixture data behind a mutex so tests can seed and
//! inspect it while the dispatcher holds shared references.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use klaxon_core::KlaxonError;
use klaxon_core::traits::{
    AlertLogStore, AlertStore, ContactMethodStore, OnCallStore, ScheduleStore, SignalParamStore,
    SubscriptionStore, VerificationStore,
};
use klaxon_core::types::{
    Alert, AlertLogEntry, ContactMethod, PushSubscription, Schedule, User,
};

fn missing(what: &str) -> KlaxonError {
    KlaxonError::Internal(format!("fixture not found: {what}"))
}

/// Contact methods keyed by user id.
#[derive(Default)]
pub struct MockContactMethodStore {
    cms: Mutex<HashMap<String, Vec<ContactMethod>>>,
}

impl MockContactMethodStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, cm: ContactMethod) {
        self.cms
            .lock()
            .await
            .entry(cm.user_id.clone())
            .or_default()
            .push(cm);
    }
}

#[async_trait]
impl ContactMethodStore for MockContactMethodStore {
    async fn find_all(&self, user_id: &str) -> Result<Vec<ContactMethod>, KlaxonError> {
        Ok(self.cms.lock().await.get(user_id).cloned().unwrap_or_default())
    }
}

/// Alerts, per-service info, and alert metadata.
#[derive(Default)]
pub struct MockAlertStore {
    alerts: Mutex<HashMap<i64, Alert>>,
    services: Mutex<HashMap<String, (String, u64)>>,
    metadata: Mutex<HashMap<i64, HashMap<String, String>>>,
}

impl MockAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_alert(&self, alert: Alert) {
        self.alerts.lock().await.insert(alert.id, alert);
    }

    pub async fn set_service(&self, service_id: &str, name: &str, open_alerts: u64) {
        self.services
            .lock()
            .await
            .insert(service_id.to_string(), (name.to_string(), open_alerts));
    }

    pub async fn set_metadata(&self, alert_id: i64, meta: HashMap<String, String>) {
        self.metadata.lock().await.insert(alert_id, meta);
    }
}

#[async_trait]
impl AlertStore for MockAlertStore {
    async fn find_one(&self, alert_id: i64) -> Result<Alert, KlaxonError> {
        self.alerts
            .lock()
            .await
            .get(&alert_id)
            .cloned()
            .ok_or_else(|| missing(&format!("alert {alert_id}")))
    }

    async fn service_info(&self, service_id: &str) -> Result<(String, u64), KlaxonError> {
        self.services
            .lock()
            .await
            .get(service_id)
            .cloned()
            .ok_or_else(|| missing(&format!("service {service_id}")))
    }

    async fn metadata(&self, alert_id: i64) -> Result<HashMap<String, String>, KlaxonError> {
        Ok(self
            .metadata
            .lock()
            .await
            .get(&alert_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Alert log entries keyed by id.
#[derive(Default)]
pub struct MockAlertLogStore {
    entries: Mutex<HashMap<i64, AlertLogEntry>>,
}

impl MockAlertLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, entry: AlertLogEntry) {
        self.entries.lock().await.insert(entry.id, entry);
    }
}

#[async_trait]
impl AlertLogStore for MockAlertLogStore {
    async fn find_one(&self, log_id: i64) -> Result<AlertLogEntry, KlaxonError> {
        self.entries
            .lock()
            .await
            .get(&log_id)
            .cloned()
            .ok_or_else(|| missing(&format!("alert log entry {log_id}")))
    }
}

/// Schedules keyed by id.
#[derive(Default)]
pub struct MockScheduleStore {
    schedules: Mutex<HashMap<Uuid, Schedule>>,
}

impl MockScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, schedule: Schedule) {
        self.schedules.lock().await.insert(schedule.id, schedule);
    }
}

#[async_trait]
impl ScheduleStore for MockScheduleStore {
    async fn find_one(&self, schedule_id: Uuid) -> Result<Schedule, KlaxonError> {
        self.schedules
            .lock()
            .await
            .get(&schedule_id)
            .cloned()
            .ok_or_else(|| missing(&format!("schedule {schedule_id}")))
    }
}

/// On-call rosters keyed by schedule id.
#[derive(Default)]
pub struct MockOnCallStore {
    rosters: Mutex<HashMap<Uuid, Vec<User>>>,
}

impl MockOnCallStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_roster(&self, schedule_id: Uuid, users: Vec<User>) {
        self.rosters.lock().await.insert(schedule_id, users);
    }
}

#[async_trait]
impl OnCallStore for MockOnCallStore {
    async fn on_call_users_by_schedule(
        &self,
        schedule_id: Uuid,
    ) -> Result<Vec<User>, KlaxonError> {
        Ok(self
            .rosters
            .lock()
            .await
            .get(&schedule_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Verification codes keyed by verification id.
#[derive(Default)]
pub struct MockVerificationStore {
    codes: Mutex<HashMap<Uuid, u32>>,
}

impl MockVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_code(&self, verify_id: Uuid, code: u32) {
        self.codes.lock().await.insert(verify_id, code);
    }
}

#[async_trait]
impl VerificationStore for MockVerificationStore {
    async fn code(&self, verify_id: Uuid) -> Result<u32, KlaxonError> {
        self.codes
            .lock()
            .await
            .get(&verify_id)
            .copied()
            .ok_or_else(|| missing(&format!("verification {verify_id}")))
    }
}

/// Signal message parameters keyed by message id.
#[derive(Default)]
pub struct MockSignalParamStore {
    params: Mutex<HashMap<Uuid, HashMap<String, String>>>,
}

impl MockSignalParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_params(&self, message_id: Uuid, params: HashMap<String, String>) {
        self.params.lock().await.insert(message_id, params);
    }
}

#[async_trait]
impl SignalParamStore for MockSignalParamStore {
    async fn params(&self, message_id: Uuid) -> Result<HashMap<String, String>, KlaxonError> {
        self.params
            .lock()
            .await
            .get(&message_id)
            .cloned()
            .ok_or_else(|| missing(&format!("signal params {message_id}")))
    }
}

/// Push subscriptions keyed by user id, with deletion capture.
#[derive(Default)]
pub struct MockSubscriptionStore {
    subs: Mutex<HashMap<String, Vec<PushSubscription>>>,
    deleted: Mutex<Vec<String>>,
}

impl MockSubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user_id: &str, sub: PushSubscription) {
        self.subs
            .lock()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(sub);
    }

    /// Endpoints removed via `delete`, in call order.
    pub async fn deleted_endpoints(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }

    pub async fn subscriptions_for(&self, user_id: &str) -> Vec<PushSubscription> {
        self.subs.lock().await.get(user_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl SubscriptionStore for MockSubscriptionStore {
    async fn find_all(&self, user_id: &str) -> Result<Vec<PushSubscription>, KlaxonError> {
        Ok(self
            .subs
            .lock()
            .await
            .get(user_id)
            .map(|subs| subs.iter().filter(|s| s.is_complete()).cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, endpoint: &str) -> Result<(), KlaxonError> {
        let mut subs = self.subs.lock().await;
        for list in subs.values_mut() {
            list.retain(|s| s.endpoint != endpoint);
        }
        self.deleted.lock().await.push(endpoint.to_string());
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &str) -> Result<(), KlaxonError> {
        self.subs.lock().await.remove(user_id);
        Ok(())
    }
}
