// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message sender for deterministic testing.
//!
//! `MockSender` implements `MessageSender` with captured payloads and an
//! injectable result queue for assertion in tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use klaxon_core::KlaxonError;
use klaxon_core::traits::MessageSender;
use klaxon_core::types::{NotificationPayload, SentMessage};

/// A mock provider that captures everything it is asked to send.
///
/// Results are popped from an injected queue; when the queue is empty the
/// sender reports success with a generated external id.
#[derive(Default)]
pub struct MockSender {
    sent: Mutex<Vec<NotificationPayload>>,
    results: Mutex<VecDeque<SentMessage>>,
}

impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result for a future `send` call.
    pub async fn queue_result(&self, result: SentMessage) {
        self.results.lock().await.push_back(result);
    }

    /// All payloads passed to `send`, in order.
    pub async fn sent_payloads(&self) -> Vec<NotificationPayload> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl MessageSender for MockSender {
    async fn send(&self, payload: &NotificationPayload) -> Result<SentMessage, KlaxonError> {
        self.sent.lock().await.push(payload.clone());
        let queued = self.results.lock().await.pop_front();
        Ok(queued.unwrap_or_else(|| {
            SentMessage::sent_with_id(format!("mock-msg-{}", uuid::Uuid::new_v4()))
        }))
    }
}
