// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message dispatch pipeline for the Klaxon notification engine.
//!
//! Turns pending messages into outbound deliveries: the pending-set
//! partitioner selects what is eligible now, the priority policy promotes or
//! suppresses voice, the dispatcher resolves entities into payloads and
//! routes them through the notification manager, and the delivery tracker
//! remembers the first send per alert/destination pair.

pub mod dispatch;
pub mod manager;
pub mod oncall;
pub mod pending;
pub mod priority;
pub mod tracking;

pub use dispatch::Dispatcher;
pub use manager::NotificationManager;
pub use oncall::filter_primary_step_user_ids;
pub use pending::split_pending_by_type;
pub use priority::apply_high_priority_override;
pub use tracking::MemoryDeliveryTracker;
