// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prescription ledgers for RxRelay.
//!
//! Every dispatched prescription is appended as one row. Two backends are
//! available, selected by `ledger.backend`: a CSV file and a SQLite table.

pub mod csv_ledger;
pub mod row;
pub mod sqlite_ledger;

use std::sync::Arc;

use rxrelay_config::model::{LedgerBackend, LedgerConfig};
use rxrelay_core::{Ledger, RxRelayError};

pub use csv_ledger::CsvLedger;
pub use row::{COLUMNS, LedgerRow};
pub use sqlite_ledger::SqliteLedger;

/// Opens the configured ledger backend.
pub async fn open_ledger(config: &LedgerConfig) -> Result<Arc<dyn Ledger>, RxRelayError> {
    match config.backend {
        LedgerBackend::Csv => Ok(Arc::new(CsvLedger::new(&config.csv_path))),
        LedgerBackend::Sqlite => Ok(Arc::new(SqliteLedger::open(&config.database_path).await?)),
    }
}

#[cfg(test)]
mod tests {
    use rxrelay_core::{AdapterType, PatientPhone, PluginAdapter, PrescriptionRecord};

    use super::*;

    fn record() -> PrescriptionRecord {
        PrescriptionRecord {
            doctor_name: "Budi".into(),
            patient_name: "Sari".into(),
            patient_birth_date: "1990-01-01".into(),
            registry_number: "RM-1".into(),
            medications: vec!["Amoxicillin".into()],
            patient_phone: PatientPhone::Unknown,
            payment_method: "Cash".into(),
        }
    }

    #[tokio::test]
    async fn open_ledger_selects_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig {
            backend: LedgerBackend::Csv,
            csv_path: dir.path().join("rx.csv").display().to_string(),
            ..LedgerConfig::default()
        };
        let ledger = open_ledger(&config).await.unwrap();
        assert_eq!(ledger.name(), "csv-ledger");
        assert_eq!(ledger.adapter_type(), AdapterType::Ledger);
        ledger.append_record(&record(), 1).await.unwrap();
        assert!(dir.path().join("rx.csv").exists());
    }

    #[tokio::test]
    async fn open_ledger_selects_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig {
            backend: LedgerBackend::Sqlite,
            database_path: dir.path().join("rx.db").display().to_string(),
            ..LedgerConfig::default()
        };
        let ledger = open_ledger(&config).await.unwrap();
        assert_eq!(ledger.name(), "sqlite-ledger");
        ledger.append_record(&record(), 1).await.unwrap();
    }
}
