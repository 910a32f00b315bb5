// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the RxRelay configuration system.

use rxrelay_config::diagnostic::ConfigError;
use rxrelay_config::model::{LedgerBackend, RxRelayConfig};
use rxrelay_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

const VALID: &str = r#"
[bot]
name = "clinic-bot"
log_level = "debug"
allowed_senders = ["6281111111111", "6282222222222"]

[whatsapp]
api_url = "http://gowa.local:3000"
username = "gowa"
password = "secret"
pharmacy_number = "6281200000000"

[ledger]
backend = "sqlite"
database_path = "/tmp/rxrelay-test.db"

[gateway]
host = "0.0.0.0"
port = 9090

[templates]
sheet_link = "https://docs.example.com/sheet"
"#;

#[test]
fn valid_toml_deserializes_into_config() {
    let config = load_and_validate_str(VALID).expect("valid TOML should load");
    assert_eq!(config.bot.name, "clinic-bot");
    assert_eq!(config.bot.allowed_senders.len(), 2);
    assert_eq!(config.whatsapp.api_url, "http://gowa.local:3000");
    assert_eq!(config.whatsapp.username, "gowa");
    assert_eq!(config.whatsapp.pharmacy_number, "6281200000000");
    assert_eq!(config.ledger.backend, LedgerBackend::Sqlite);
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.templates.sheet_link, "https://docs.example.com/sheet");
    // Untouched templates keep their defaults.
    assert_eq!(config.templates.session_complete, "Session complete.");
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.bot.name, "rxrelay");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.bot.allowed_senders.is_empty());
    assert_eq!(config.whatsapp.api_url, "http://localhost:3000");
    assert_eq!(config.whatsapp.timeout_secs, 30);
    assert_eq!(config.ledger.backend, LedgerBackend::Csv);
    assert_eq!(config.ledger.csv_path, "./storage/prescriptions.csv");
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.webhook_path, "/webhook");
    assert!(config.gateway.send_token.is_none());
    assert_eq!(config.phone.country_code, "62");
    assert_eq!(config.phone.trunk_prefix, "0");
    assert_eq!(config.phone.subscriber_prefix, "8");
    assert!(!config.metrics.enabled);
}

#[test]
fn unknown_key_yields_suggestion() {
    let toml = r#"
[whatsapp]
pharmacy_numbr = "628"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key should be rejected");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("pharmacy_number"));
}

#[test]
fn unknown_ledger_backend_is_rejected() {
    let toml = r#"
[ledger]
backend = "excel"
"#;
    let err = load_config_from_str(toml).expect_err("unknown backend should fail");
    assert!(err.to_string().contains("excel"), "got: {err}");
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[gateway]
port = "eighty"
"#;
    let errors = load_and_validate_str(toml).expect_err("wrong type should be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

#[test]
fn dotted_override_maps_to_nested_key() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: RxRelayConfig = Figment::new()
        .merge(Serialized::defaults(RxRelayConfig::default()))
        .merge(Toml::string(VALID))
        .merge(("whatsapp.pharmacy_number", "6289999999999"))
        .extract()
        .expect("override should merge");

    assert_eq!(config.whatsapp.pharmacy_number, "6289999999999");
}

#[test]
fn custom_template_overrides_default() {
    let toml = r#"
[whatsapp]
pharmacy_number = "628120"

[templates]
menu = "Halo!\n[1] Kirim\n[2] Link\n[3] Batal"
"#;
    let config = load_and_validate_str(toml).expect("should load");
    assert!(config.templates.menu.starts_with("Halo!"));
}

#[test]
#[serial_test::serial]
fn loads_from_explicit_path() {
    let dir = std::env::temp_dir().join(format!("rxrelay-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rxrelay.toml");
    std::fs::write(&path, VALID).unwrap();

    let config = load_and_validate_path(&path).expect("file config should load");
    assert_eq!(config.bot.name, "clinic-bot");

    std::fs::remove_dir_all(&dir).unwrap();
}
