// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for notification providers.
//!
//! A provider may implement any subset of identification, field validation,
//! display rendering, and message sending. The dispatch core only requires
//! [`MessageSender`]; the other capabilities serve the configuration and
//! profile surfaces.

use async_trait::async_trait;

use crate::error::KlaxonError;
use crate::types::{Destination, DisplayInfo, NotificationPayload, SentMessage, TypeInfo};

/// Identification: a stable destination-type id plus display metadata and
/// enablement derived from the provider's configuration snapshot.
pub trait Provider: Send + Sync {
    fn dest_type(&self) -> crate::types::DestType;

    fn type_info(&self) -> TypeInfo;
}

/// Per-argument and whole-destination syntax/semantics checks.
pub trait DestValidator: Send + Sync {
    fn validate_field(&self, field: &str, value: &str) -> Result<(), KlaxonError>;

    /// Validates every argument of a destination of this provider's type.
    fn validate_dest(&self, dest: &Destination) -> Result<(), KlaxonError> {
        for (field, value) in dest.args() {
            self.validate_field(field, value)?;
        }
        Ok(())
    }
}

/// Human-readable rendering of a destination.
pub trait DestDisplayer: Send + Sync {
    fn display_info(&self, dest: &Destination) -> DisplayInfo;
}

/// Message sending, the one capability the dispatch core requires.
///
/// Implementations block on provider I/O; a cancelled or timed-out call must
/// surface as a temporary failure, never a permanent one.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> Result<SentMessage, KlaxonError>;
}
