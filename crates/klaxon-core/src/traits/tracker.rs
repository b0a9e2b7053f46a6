// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery tracking: which message was the first sent for an
//! alert/destination pair.

use async_trait::async_trait;

use crate::error::KlaxonError;
use crate::types::{DeliveryRecord, DestId};

/// Records and looks up the original delivery for an (alert, destination)
/// pair so later status-change messages can reference it.
#[async_trait]
pub trait DeliveryTracker: Send + Sync {
    /// Returns the recorded first delivery for the pair, or `None`.
    async fn original_status(
        &self,
        alert_id: i64,
        dest_id: &DestId,
    ) -> Result<Option<DeliveryRecord>, KlaxonError>;

    /// Records the first delivery for the pair.
    ///
    /// First write wins: an existing record is never overwritten, and losing
    /// a concurrent race is not an error. The read path only needs *a* prior
    /// reference, not a specific one.
    async fn record(
        &self,
        dest_id: &DestId,
        alert_id: i64,
        message_id: &str,
    ) -> Result<(), KlaxonError>;
}
