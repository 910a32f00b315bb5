// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./rxrelay.toml` > `~/.config/rxrelay/rxrelay.toml` > `/etc/rxrelay/rxrelay.toml`
//! with environment variable overrides via `RXRELAY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RxRelayConfig;

/// Config sections that environment variables may address.
const ENV_SECTIONS: &[&str] = &[
    "bot",
    "whatsapp",
    "ledger",
    "gateway",
    "phone",
    "templates",
    "metrics",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rxrelay/rxrelay.toml` (system-wide)
/// 3. `~/.config/rxrelay/rxrelay.toml` (user XDG config)
/// 4. `./rxrelay.toml` (local directory)
/// 5. `RXRELAY_*` environment variables
pub fn load_config() -> Result<RxRelayConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RxRelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RxRelayConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RxRelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RxRelayConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RxRelayConfig::default()))
        .merge(Toml::file("/etc/rxrelay/rxrelay.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("rxrelay/rxrelay.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("rxrelay.toml"))
        .merge(env_provider())
}

/// Map an env var key (prefix stripped, lowercased) to a dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `whatsapp_pharmacy_number` maps to `whatsapp.pharmacy_number`.
pub fn env_key_to_path(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("RXRELAY_").map(|key| env_key_to_path(key.as_str()).into())
}
