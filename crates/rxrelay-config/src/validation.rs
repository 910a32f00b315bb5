// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, digit-only phone prefixes, and a unique sender allow-list.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{LedgerBackend, RxRelayConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RxRelayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let api_url = config.whatsapp.api_url.trim();
    if api_url.is_empty() {
        fail("whatsapp.api_url must not be empty".to_string());
    } else if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        fail(format!(
            "whatsapp.api_url `{api_url}` must start with http:// or https://"
        ));
    }

    if config.whatsapp.pharmacy_number.trim().is_empty() {
        fail("whatsapp.pharmacy_number must not be empty".to_string());
    }

    if config.whatsapp.timeout_secs == 0 {
        fail("whatsapp.timeout_secs must be at least 1".to_string());
    }

    let mut seen = HashSet::new();
    for (i, sender) in config.bot.allowed_senders.iter().enumerate() {
        if sender.trim().is_empty() {
            fail(format!("bot.allowed_senders[{i}] must not be empty"));
        } else if !seen.insert(sender.as_str()) {
            fail(format!("duplicate sender `{sender}` in bot.allowed_senders"));
        }
    }

    for (key, value) in [
        ("phone.country_code", &config.phone.country_code),
        ("phone.trunk_prefix", &config.phone.trunk_prefix),
        ("phone.subscriber_prefix", &config.phone.subscriber_prefix),
    ] {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            fail(format!("{key} must be a non-empty string of digits, got `{value}`"));
        }
    }

    if !config.gateway.webhook_path.starts_with('/') {
        fail(format!(
            "gateway.webhook_path `{}` must start with `/`",
            config.gateway.webhook_path
        ));
    }

    if let Some(token) = &config.gateway.send_token
        && token.trim().is_empty()
    {
        fail("gateway.send_token must not be empty when set".to_string());
    }

    match config.ledger.backend {
        LedgerBackend::Csv if config.ledger.csv_path.trim().is_empty() => {
            fail("ledger.csv_path must not be empty when backend is csv".to_string());
        }
        LedgerBackend::Sqlite if config.ledger.database_path.trim().is_empty() => {
            fail("ledger.database_path must not be empty when backend is sqlite".to_string());
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
