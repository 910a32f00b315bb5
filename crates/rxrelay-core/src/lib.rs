// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for RxRelay, the doctor-to-pharmacy prescription relay.
//!
//! This crate provides the port traits that outbound adapters implement
//! (chat delivery and the durable prescription ledger), the shared error
//! type, and the prescription data model used throughout the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RxRelayError;
pub use types::{
    AdapterType, HealthStatus, InboundMessage, PatientPhone, PrescriptionRecord, QueueAssignment,
};

// Re-export all port traits at crate root.
pub use traits::{ChatSender, Ledger, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rxrelay_error_has_all_variants() {
        let _config = RxRelayError::Config("test".into());
        let _send = RxRelayError::Send {
            recipient: "6281234567890".into(),
            message: "test".into(),
            source: None,
        };
        let _ledger = RxRelayError::Ledger {
            source: Box::new(std::io::Error::other("test")),
        };
        let _missing = RxRelayError::MissingFields {
            fields: vec!["Payment Method".into()],
        };
        let _storage = RxRelayError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _internal = RxRelayError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Chat, AdapterType::Ledger] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_port_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_chat_sender<T: ChatSender>() {}
        fn _assert_ledger<T: Ledger>() {}
    }
}
