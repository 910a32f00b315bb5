// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for RxRelay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level RxRelay configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RxRelayConfig {
    /// Bot identity and sender allow-list.
    #[serde(default)]
    pub bot: BotConfig,

    /// WhatsApp chat gateway settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Prescription ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Inbound webhook HTTP server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Phone number normalization rules.
    #[serde(default)]
    pub phone: PhoneConfig,

    /// User-facing message texts.
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Prometheus metrics settings.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Bot identity and authorization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot, used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Doctor phone numbers allowed to talk to the bot. Compared verbatim
    /// against the webhook sender identifier; an empty list rejects everyone.
    #[serde(default)]
    pub allowed_senders: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            allowed_senders: Vec::new(),
        }
    }
}

fn default_bot_name() -> String {
    "rxrelay".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// WhatsApp chat gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Base URL of the chat gateway REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Basic-auth username for the gateway.
    #[serde(default = "default_gateway_username")]
    pub username: String,

    /// Basic-auth password for the gateway.
    #[serde(default = "default_gateway_password")]
    pub password: String,

    /// Phone number of the pharmacy that receives prescriptions.
    #[serde(default)]
    pub pharmacy_number: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            username: default_gateway_username(),
            password: default_gateway_password(),
            pharmacy_number: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_gateway_username() -> String {
    "admin".to_string()
}

fn default_gateway_password() -> String {
    "admin".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Which ledger backend records dispatched prescriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// Append rows to a local CSV file.
    #[default]
    Csv,
    /// Insert rows into a local SQLite database.
    Sqlite,
}

/// Prescription ledger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Selected backend.
    #[serde(default)]
    pub backend: LedgerBackend,

    /// CSV file path (used by the `csv` backend).
    #[serde(default = "default_csv_path")]
    pub csv_path: String,

    /// SQLite database path (used by the `sqlite` backend).
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            csv_path: default_csv_path(),
            database_path: default_database_path(),
        }
    }
}

fn default_csv_path() -> String {
    "./storage/prescriptions.csv".to_string()
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("rxrelay").join("rxrelay.db"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "rxrelay.db".to_string())
}

/// Inbound webhook server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Route the chat gateway posts deliveries to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Bearer token for `POST /v1/messages/send`. The route rejects every
    /// request while this is unset.
    #[serde(default)]
    pub send_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
            send_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

/// Phone number normalization rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneConfig {
    /// Country calling code prepended to national numbers.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// National trunk prefix replaced by the country code.
    #[serde(default = "default_trunk_prefix")]
    pub trunk_prefix: String,

    /// Leading digit(s) of a subscriber number written without any prefix.
    #[serde(default = "default_subscriber_prefix")]
    pub subscriber_prefix: String,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            trunk_prefix: default_trunk_prefix(),
            subscriber_prefix: default_subscriber_prefix(),
        }
    }
}

fn default_country_code() -> String {
    "62".to_string()
}

fn default_trunk_prefix() -> String {
    "0".to_string()
}

fn default_subscriber_prefix() -> String {
    "8".to_string()
}

/// User-facing texts sent by the bot.
///
/// Placeholders in braces (`{message}`, `{link}`, `{queue}`, ...) are
/// substituted at send time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct TemplatesConfig {
    /// Main menu, sent after `/start`.
    pub menu: String,
    /// Blank submission form.
    pub form: String,
    /// Confirmation prompt. `{message}` is the echoed submission.
    pub confirm_prompt: String,
    /// Spreadsheet link reply. `{link}` is `sheet_link`.
    pub sheet_link_message: String,
    /// Link to the shared prescription spreadsheet.
    pub sheet_link: String,
    pub session_complete: String,
    pub session_cancelled: String,
    /// Sent when `cancel` is received during form submission.
    pub form_cancelled: String,
    /// Sent before the form when the doctor answers `N`.
    pub resubmit_form: String,
    pub malformed_submission: String,
    pub ledger_failed: String,
    pub pharmacy_failed: String,
    /// Final acknowledgment to the doctor.
    pub dispatched: String,
    /// Pharmacy notification. Placeholders: `{medication}`, `{queue}`,
    /// `{patient}`, `{birth_date}`, `{phone}`, `{doctor}`.
    pub pharmacy_message: String,
    /// Patient notification. Placeholders: `{medication}`, `{queue}`.
    pub patient_notice: String,
    pub reject_start: String,
    pub reject_menu: String,
    pub reject_form: String,
    pub reject_confirmation: String,
}

const MENU_OPTIONS: &str =
    "[1] Send message to pharmacy\n[2] Get Spreadsheet link\n[3] Cancel\n\nAnswer with number only!";

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            menu: format!("Hello, this is the doctor to pharmacy bot.\n{MENU_OPTIONS}"),
            form: "Please send patient details in the format:\n\
                   Doctor Name: [Name]\n\
                   Patient Name: [Name]\n\
                   Patient Birth Date: [Date]\n\
                   Registry Number: [Number]\n\
                   Medication: [Drug, Drug]\n\
                   Patient Phone Number: [Number or -]\n\
                   Payment Method: [Method]"
                .to_string(),
            confirm_prompt:
                "Please confirm the following request is correct:\n\n{message}\n\nIs this correct? (Y/N)"
                    .to_string(),
            sheet_link_message: "Here is the spreadsheet link: {link}".to_string(),
            sheet_link: String::new(),
            session_complete: "Session complete.".to_string(),
            session_cancelled: "Session cancelled. To start again, send `/start`.".to_string(),
            form_cancelled: format!(
                "Request cancelled. Returning to the main menu.\n\n{MENU_OPTIONS}"
            ),
            resubmit_form:
                "Request cancelled. Please submit the form again with the correct details."
                    .to_string(),
            malformed_submission: "Error: The submitted data was malformed. Please try again."
                .to_string(),
            ledger_failed: "Note: Failed to save the record to the spreadsheet, \
                            but will still attempt to send to pharmacy."
                .to_string(),
            pharmacy_failed: "Failed to send the request to the pharmacy. Please try again later."
                .to_string(),
            dispatched: "Your request was sent to the pharmacy. Session complete.".to_string(),
            pharmacy_message: "New prescription request:\n{medication}\n\n\
                               With Queue Number: {queue}\n\n\
                               This medicine is for:\n{patient}\n{birth_date}\n{phone}\n\n\
                               From:\nDoctor {doctor}"
                .to_string(),
            patient_notice: "Your prescription request for {medication} has been sent to the \
                             pharmacy. Your queue number is {queue}. Please wait for further \
                             updates from the pharmacy."
                .to_string(),
            reject_start: "To start a new session, send `/start`.".to_string(),
            reject_menu: "Invalid input. Please reply with `1`, `2`, or `3`.".to_string(),
            reject_form: "The submitted format is incorrect. Please follow the required format \
                          or send `cancel` to return to the main menu."
                .to_string(),
            reject_confirmation:
                "Unexpected response. Please reply 'Y' to confirm or 'N' to edit.".to_string(),
        }
    }
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `GET /metrics`.
    #[serde(default)]
    pub enabled: bool,
}
