// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Klaxon notification dispatch engine.
//!
//! This crate provides the shared data model (messages, destinations,
//! payloads, send results), the `KlaxonError` type, and the trait seams
//! between the dispatch pipeline, its collaborator stores, and the
//! notification providers. It performs no I/O of its own.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::KlaxonError;
pub use types::{
    AlertState, DeliveryRecord, DestId, DestType, Destination, Message, MessageType,
    NotificationPayload, SendResult, SendState, SentMessage,
};

// Re-export all traits at crate root.
pub use traits::{
    AlertLogStore, AlertStore, ContactMethodStore, DeliveryTracker, DestDisplayer, DestValidator,
    MessageSender, OnCallStore, Provider, ScheduleStore, SignalParamStore, SubscriptionStore,
    VerificationStore,
};
