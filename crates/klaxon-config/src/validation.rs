// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates cross-field constraints that cannot be expressed via serde
//! attributes, such as required credentials for enabled providers.

use crate::diagnostic::ConfigError;
use crate::model::KlaxonConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &KlaxonConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // The priority label pair is all-or-nothing; a half-set pair silently
    // disables the policy, which is always a misconfiguration.
    let key_set = !config.alerts.high_priority_label_key.is_empty();
    let value_set = !config.alerts.high_priority_label_value.is_empty();
    if key_set != value_set {
        errors.push(ConfigError::Validation {
            message: "alerts.high_priority_label_key and alerts.high_priority_label_value \
                      must be set together"
                .to_string(),
        });
    }

    if config.twilio.enable {
        for (field, value) in [
            ("twilio.account_sid", &config.twilio.account_sid),
            ("twilio.auth_token", &config.twilio.auth_token),
            ("twilio.from_number", &config.twilio.from_number),
        ] {
            if value.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("{field} is required when twilio.enable is true"),
                });
            }
        }
    }

    if config.gupshup.enable && config.gupshup.source.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gupshup.source is required when gupshup.enable is true".to_string(),
        });
    }

    if config.webpush.enable
        && (config.webpush.vapid_public_key.trim().is_empty()
            || config.webpush.vapid_private_key.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "webpush.vapid_public_key and webpush.vapid_private_key are required \
                      when webpush.enable is true"
                .to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = KlaxonConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn half_set_priority_label_fails_validation() {
        let mut config = KlaxonConfig::default();
        config.alerts.high_priority_label_key = "alerts/priority".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("must be set together"))
        ));
    }

    #[test]
    fn enabled_twilio_requires_credentials() {
        let mut config = KlaxonConfig::default();
        config.twilio.enable = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn enabled_webpush_requires_both_vapid_keys() {
        let mut config = KlaxonConfig::default();
        config.webpush.enable = true;
        config.webpush.vapid_public_key = "pub".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("vapid"))
        ));
    }

    #[test]
    fn fully_configured_providers_pass() {
        let mut config = KlaxonConfig::default();
        config.twilio.enable = true;
        config.twilio.account_sid = "AC123".to_string();
        config.twilio.auth_token = "token".to_string();
        config.twilio.from_number = "+15555550100".to_string();
        config.gupshup.enable = true;
        config.gupshup.source = "KLAXON".to_string();
        config.webpush.enable = true;
        config.webpush.vapid_public_key = "pub".to_string();
        config.webpush.vapid_private_key = "priv".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
