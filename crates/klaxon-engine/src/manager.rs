// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The notification manager: one egress point fanning out to providers.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use klaxon_core::KlaxonError;
use klaxon_core::traits::MessageSender;
use klaxon_core::types::{DestType, NotificationPayload, SendResult};

/// Routes payloads to providers by destination type.
///
/// The mapping is built at startup via [`register`](Self::register); dispatch
/// never inspects provider types at runtime. A payload whose destination type
/// has no registered provider yields a permanent failure result, logged
/// loudly, never a panic.
#[derive(Default)]
pub struct NotificationManager {
    providers: HashMap<DestType, Arc<dyn MessageSender>>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider for a destination type.
    ///
    /// Registering the same type twice is a configuration error.
    pub fn register(
        &mut self,
        dest_type: impl Into<DestType>,
        sender: Arc<dyn MessageSender>,
    ) -> Result<(), KlaxonError> {
        let dest_type = dest_type.into();
        if self.providers.contains_key(&dest_type) {
            return Err(KlaxonError::Config(format!(
                "provider already registered for destination type {dest_type}"
            )));
        }
        self.providers.insert(dest_type, sender);
        Ok(())
    }

    pub fn is_registered(&self, dest_type: &DestType) -> bool {
        self.providers.contains_key(dest_type)
    }

    /// Dispatches one payload through its destination type's provider.
    pub async fn send(&self, payload: &NotificationPayload) -> Result<SendResult, KlaxonError> {
        let dest_type = payload.dest_type();
        let message_id = payload.base().message_id.clone();

        let Some(sender) = self.providers.get(dest_type) else {
            error!(
                %dest_type,
                message_id = message_id.as_str(),
                "SEND NOT IMPLEMENTED FOR DESTINATION TYPE"
            );
            return Ok(SendResult::failed_perm(
                message_id,
                format!("no provider registered for destination type {dest_type}"),
            ));
        };

        let sent = sender.send(payload).await?;
        debug!(%dest_type, state = %sent.state, details = sent.details.as_str(), "provider result");
        Ok(SendResult::from_sent(message_id, sent))
    }
}
