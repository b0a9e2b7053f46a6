// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory delivery tracker.

use async_trait::async_trait;
use dashmap::DashMap;

use klaxon_core::KlaxonError;
use klaxon_core::traits::DeliveryTracker;
use klaxon_core::types::{DeliveryRecord, DestId};

/// Key-scoped, first-write-wins implementation of [`DeliveryTracker`].
///
/// Entries are sharded by (alert, destination) pair, so concurrent writers
/// for distinct alerts never contend on a shared lock; concurrent first
/// deliveries for the same pair race and exactly one wins.
#[derive(Debug, Default)]
pub struct MemoryDeliveryTracker {
    records: DashMap<(i64, DestId), DeliveryRecord>,
}

impl MemoryDeliveryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DeliveryTracker for MemoryDeliveryTracker {
    async fn original_status(
        &self,
        alert_id: i64,
        dest_id: &DestId,
    ) -> Result<Option<DeliveryRecord>, KlaxonError> {
        Ok(self
            .records
            .get(&(alert_id, *dest_id))
            .map(|entry| entry.value().clone()))
    }

    async fn record(
        &self,
        dest_id: &DestId,
        alert_id: i64,
        message_id: &str,
    ) -> Result<(), KlaxonError> {
        self.records
            .entry((alert_id, *dest_id))
            .or_insert_with(|| DeliveryRecord {
                message_id: message_id.to_owned(),
                alert_id,
                dest_id: *dest_id,
            });
        Ok(())
    }
}
