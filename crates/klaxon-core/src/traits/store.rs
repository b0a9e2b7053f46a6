// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator store traits resolved by the dispatch pipeline.
//!
//! These are the engine's read-side dependencies; persistence lives behind
//! them and is out of scope here. All are safe for concurrent readers.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::KlaxonError;
use crate::types::{
    Alert, AlertLogEntry, ContactMethod, PushSubscription, Schedule, User,
};

/// Lookup of a user's registered contact methods.
#[async_trait]
pub trait ContactMethodStore: Send + Sync {
    async fn find_all(&self, user_id: &str) -> Result<Vec<ContactMethod>, KlaxonError>;
}

/// Alert and service lookups.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn find_one(&self, alert_id: i64) -> Result<Alert, KlaxonError>;

    /// Returns the service's display name and its live unacknowledged-alert
    /// count.
    async fn service_info(&self, service_id: &str) -> Result<(String, u64), KlaxonError>;

    async fn metadata(&self, alert_id: i64) -> Result<HashMap<String, String>, KlaxonError>;
}

/// Alert log entry lookup.
#[async_trait]
pub trait AlertLogStore: Send + Sync {
    async fn find_one(&self, log_id: i64) -> Result<AlertLogEntry, KlaxonError>;
}

/// Schedule lookup.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn find_one(&self, schedule_id: Uuid) -> Result<Schedule, KlaxonError>;
}

/// Current on-call roster lookup.
#[async_trait]
pub trait OnCallStore: Send + Sync {
    async fn on_call_users_by_schedule(
        &self,
        schedule_id: Uuid,
    ) -> Result<Vec<User>, KlaxonError>;
}

/// Verification code lookup.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    async fn code(&self, verify_id: Uuid) -> Result<u32, KlaxonError>;
}

/// Stored parameters for signal webhook messages.
#[async_trait]
pub trait SignalParamStore: Send + Sync {
    async fn params(&self, message_id: Uuid) -> Result<HashMap<String, String>, KlaxonError>;
}

/// Persisted browser push subscriptions, keyed by user.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Returns all complete subscriptions for the user; malformed rows are
    /// skipped with a warning rather than failing the whole lookup.
    async fn find_all(&self, user_id: &str) -> Result<Vec<PushSubscription>, KlaxonError>;

    /// Deletes a subscription by endpoint. Idempotent.
    async fn delete(&self, endpoint: &str) -> Result<(), KlaxonError>;

    /// Deletes every stored subscription for the user.
    async fn delete_for_user(&self, user_id: &str) -> Result<(), KlaxonError>;
}
