// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the provider layer and the engine's collaborators.
//!
//! Provider capabilities are split so each channel implements only the
//! subset it supports; collaborator stores use `#[async_trait]` for dynamic
//! dispatch compatibility.

pub mod provider;
pub mod store;
pub mod tracker;

pub use provider::{DestDisplayer, DestValidator, MessageSender, Provider};
pub use store::{
    AlertLogStore, AlertStore, ContactMethodStore, OnCallStore, ScheduleStore, SignalParamStore,
    SubscriptionStore, VerificationStore,
};
pub use tracker::DeliveryTracker;
