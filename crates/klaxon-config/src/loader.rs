// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./klaxon.toml` > `~/.config/klaxon/klaxon.toml`
//! > `/etc/klaxon/klaxon.toml` with environment variable overrides via the
//! `KLAXON_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KlaxonConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/klaxon/klaxon.toml` (system-wide)
/// 3. `~/.config/klaxon/klaxon.toml` (user XDG config)
/// 4. `./klaxon.toml` (local directory)
/// 5. `KLAXON_*` environment variables
pub fn load_config() -> Result<KlaxonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KlaxonConfig::default()))
        .merge(Toml::file("/etc/klaxon/klaxon.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("klaxon/klaxon.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("klaxon.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file or env lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<KlaxonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KlaxonConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KlaxonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KlaxonConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `KLAXON_ALERTS_HIGH_PRIORITY_LABEL_KEY`
/// must map to `alerts.high_priority_label_key`, not `alerts.high.…`.
fn env_provider() -> Env {
    Env::prefixed("KLAXON_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let mapped = key
            .as_str()
            .replacen("general_", "general.", 1)
            .replacen("alerts_", "alerts.", 1)
            .replacen("twilio_", "twilio.", 1)
            .replacen("gupshup_", "gupshup.", 1)
            .replacen("webpush_", "webpush.", 1);
        mapped.into()
    })
}
