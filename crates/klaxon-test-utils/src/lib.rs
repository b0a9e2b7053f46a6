// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Klaxon integration tests.
//!
//! Provides mock collaborator stores, a capturing message sender, and a
//! dispatch harness for fast, deterministic, CI-runnable tests without
//! external services.
//!
//! # Components
//!
//! - [`DispatchHarness`] - a dispatcher wired to mocks end to end
//! - [`MockSender`] - capturing provider with an injectable result queue
//! - `mock_stores` - fixture-backed implementations of every store trait

pub mod harness;
pub mod mock_sender;
pub mod mock_stores;

pub use harness::DispatchHarness;
pub use mock_sender::MockSender;
pub use mock_stores::{
    MockAlertLogStore, MockAlertStore, MockContactMethodStore, MockOnCallStore,
    MockScheduleStore, MockSignalParamStore, MockSubscriptionStore, MockVerificationStore,
};
