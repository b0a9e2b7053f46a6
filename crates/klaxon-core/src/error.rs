// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Klaxon dispatch engine.

use thiserror::Error;

use crate::types::{DestId, DestType};

/// The primary error type used across the dispatch engine and providers.
#[derive(Debug, Error)]
pub enum KlaxonError {
    /// Configuration errors (missing required keys, malformed values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A referenced entity could not be resolved; carries the operation name.
    #[error("{operation}: {source}")]
    Lookup {
        operation: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Provider errors (transport failure, malformed response, unsupported payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No provider is registered for the destination type.
    #[error("no provider registered for destination type {dest_type}")]
    ProviderNotFound { dest_type: DestType },

    /// A destination argument failed validation.
    #[error("invalid destination field {field}: {message}")]
    FieldValidation { field: String, message: String },

    /// A status update referenced an alert/destination pair with no recorded
    /// original notification.
    #[error("could not find original notification for alert {alert_id} to {dest_id}")]
    OriginalNotFound { alert_id: i64, dest_id: DestId },

    /// Storage-backed collaborator failed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KlaxonError {
    /// Wraps a collaborator failure with the name of the lookup that failed.
    pub fn lookup(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Lookup {
            operation,
            source: Box::new(source),
        }
    }

    /// Builds a provider error from a message alone.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a provider error wrapping an underlying transport failure.
    pub fn provider_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Provider {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
