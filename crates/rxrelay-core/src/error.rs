// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for RxRelay.

use thiserror::Error;

/// The primary error type used across all RxRelay ports and core operations.
#[derive(Debug, Error)]
pub enum RxRelayError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Outbound chat delivery failed (transport error or non-200 status).
    #[error("send to {recipient} failed: {message}")]
    Send {
        recipient: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Durable prescription log could not be appended to.
    #[error("ledger error: {source}")]
    Ledger {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A confirmed submission is missing required labeled fields.
    #[error("missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// Local storage errors (file system, database connection).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RxRelayError {
    /// Returns `true` if this error came from outbound chat delivery.
    pub fn is_send(&self) -> bool {
        matches!(self, RxRelayError::Send { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_label() {
        let err = RxRelayError::MissingFields {
            fields: vec!["Medication".into(), "Payment Method".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing required fields: Medication, Payment Method"
        );
    }

    #[test]
    fn send_error_names_recipient() {
        let err = RxRelayError::Send {
            recipient: "628111".into(),
            message: "gateway returned 502".into(),
            source: None,
        };
        assert!(err.is_send());
        assert_eq!(err.to_string(), "send to 628111 failed: gateway returned 502");
    }
}
