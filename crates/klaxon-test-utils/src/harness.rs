// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch test harness.
//!
//! Wires a [`Dispatcher`] to mock stores and capturing senders so
//! integration tests can exercise the full pipeline without external
//! services.

use std::sync::Arc;

use klaxon_config::KlaxonConfig;
use klaxon_core::KlaxonError;
use klaxon_core::types::{Message, SendResult};
use klaxon_engine::{Dispatcher, MemoryDeliveryTracker, NotificationManager};
use klaxon_twilio::{DEST_TYPE_TWILIO_SMS, DEST_TYPE_TWILIO_VOICE};
use klaxon_webpush::DEST_TYPE_WEBPUSH;

use crate::mock_sender::MockSender;
use crate::mock_stores::{
    MockAlertLogStore, MockAlertStore, MockContactMethodStore, MockOnCallStore,
    MockScheduleStore, MockSignalParamStore, MockVerificationStore,
};

/// A fully wired dispatcher over mocks, with every collaborator reachable
/// for seeding and assertions.
pub struct DispatchHarness {
    pub config: KlaxonConfig,
    pub contact_methods: Arc<MockContactMethodStore>,
    pub alerts: Arc<MockAlertStore>,
    pub alert_logs: Arc<MockAlertLogStore>,
    pub schedules: Arc<MockScheduleStore>,
    pub on_call: Arc<MockOnCallStore>,
    pub verification: Arc<MockVerificationStore>,
    pub signal_params: Arc<MockSignalParamStore>,
    pub tracker: Arc<MemoryDeliveryTracker>,
    pub sms: Arc<MockSender>,
    pub voice: Arc<MockSender>,
    pub push: Arc<MockSender>,
    dispatcher: Dispatcher,
}

impl DispatchHarness {
    /// Harness with the default test configuration: a public URL and the
    /// `alerts/priority=high` label pair enabled.
    pub fn new() -> Self {
        let mut config = KlaxonConfig::default();
        config.general.public_url = "https://klaxon.example".to_string();
        config.alerts.high_priority_label_key = "alerts/priority".to_string();
        config.alerts.high_priority_label_value = "high".to_string();
        Self::with_config(config)
    }

    pub fn with_config(config: KlaxonConfig) -> Self {
        let contact_methods = Arc::new(MockContactMethodStore::new());
        let alerts = Arc::new(MockAlertStore::new());
        let alert_logs = Arc::new(MockAlertLogStore::new());
        let schedules = Arc::new(MockScheduleStore::new());
        let on_call = Arc::new(MockOnCallStore::new());
        let verification = Arc::new(MockVerificationStore::new());
        let signal_params = Arc::new(MockSignalParamStore::new());
        let tracker = Arc::new(MemoryDeliveryTracker::new());
        let sms = Arc::new(MockSender::new());
        let voice = Arc::new(MockSender::new());
        let push = Arc::new(MockSender::new());

        let mut manager = NotificationManager::new();
        manager
            .register(DEST_TYPE_TWILIO_SMS, sms.clone())
            .expect("register sms");
        manager
            .register(DEST_TYPE_TWILIO_VOICE, voice.clone())
            .expect("register voice");
        manager
            .register(DEST_TYPE_WEBPUSH, push.clone())
            .expect("register push");

        let dispatcher = Dispatcher::new(
            contact_methods.clone(),
            alerts.clone(),
            alert_logs.clone(),
            schedules.clone(),
            on_call.clone(),
            verification.clone(),
            signal_params.clone(),
            tracker.clone(),
            manager,
        );

        Self {
            config,
            contact_methods,
            alerts,
            alert_logs,
            schedules,
            on_call,
            verification,
            signal_params,
            tracker,
            sms,
            voice,
            push,
            dispatcher,
        }
    }

    /// Dispatches one message with the harness configuration.
    pub async fn send(&self, msg: &mut Message) -> Result<SendResult, KlaxonError> {
        self.dispatcher.send_message(&self.config, msg).await
    }
}

impl Default for DispatchHarness {
    fn default() -> Self {
        Self::new()
    }
}
