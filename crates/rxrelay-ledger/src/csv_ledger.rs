// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only CSV prescription ledger.
//!
//! The header row is written when the file is created or empty. Appends are
//! serialized through one async lock and performed on the blocking pool.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rxrelay_core::{
    AdapterType, HealthStatus, Ledger, PluginAdapter, PrescriptionRecord, RxRelayError,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::row::LedgerRow;

fn ledger_err(e: impl std::error::Error + Send + Sync + 'static) -> RxRelayError {
    RxRelayError::Ledger {
        source: Box::new(e),
    }
}

/// Writes one row per dispatched prescription to a CSV file.
#[derive(Debug)]
pub struct CsvLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvLedger {
    /// Creates a ledger at `path`. The file and its parent directory are
    /// created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!(path = %path.display(), "CSV ledger configured");
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Reads every row back, oldest first.
    pub async fn read_all(&self) -> Result<Vec<LedgerRow>, RxRelayError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_rows(&path))
            .await
            .map_err(|e| RxRelayError::Internal(format!("ledger task failed: {e}")))?
    }
}

fn append_row(path: &Path, row: &LedgerRow) -> Result<(), RxRelayError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(ledger_err)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(ledger_err)?;
    let needs_header = file.metadata().map_err(ledger_err)?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(row).map_err(ledger_err)?;
    writer.flush().map_err(ledger_err)?;
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<LedgerRow>, RxRelayError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path).map_err(ledger_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<LedgerRow>, _>>()
        .map_err(ledger_err)
}

#[async_trait]
impl PluginAdapter for CsvLedger {
    fn name(&self) -> &str {
        "csv-ledger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, RxRelayError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => Ok(HealthStatus::Degraded(
                format!("directory {} does not exist yet", dir.display()),
            )),
            _ => Ok(HealthStatus::Healthy),
        }
    }

    async fn shutdown(&self) -> Result<(), RxRelayError> {
        // Wait for an in-flight append to finish.
        let _guard = self.write_lock.lock().await;
        Ok(())
    }
}

#[async_trait]
impl Ledger for CsvLedger {
    async fn append_record(
        &self,
        record: &PrescriptionRecord,
        queue_number: u32,
    ) -> Result<(), RxRelayError> {
        let row = LedgerRow::new(record, queue_number);
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_row(&path, &row))
            .await
            .map_err(|e| RxRelayError::Internal(format!("ledger task failed: {e}")))??;
        debug!(queue_number, path = %self.path.display(), "record appended to CSV ledger");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rxrelay_core::PatientPhone;

    use super::*;
    use crate::row::COLUMNS;

    fn record(patient: &str) -> PrescriptionRecord {
        PrescriptionRecord {
            doctor_name: "Budi".into(),
            patient_name: patient.into(),
            patient_birth_date: "1990-01-01".into(),
            registry_number: "RM-1".into(),
            medications: vec!["Amoxicillin 500mg".into(), "Paracetamol".into()],
            patient_phone: PatientPhone::Number("6281234567890".into()),
            payment_method: "Cash".into(),
        }
    }

    #[tokio::test]
    async fn first_append_creates_directory_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage").join("prescriptions.csv");
        let ledger = CsvLedger::new(&path);

        ledger.append_record(&record("Sari"), 1).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(COLUMNS.join(",").as_str()));
        let data = lines.next().unwrap();
        assert!(data.starts_with("1,Budi,Sari,1990-01-01,RM-1,"));
        assert!(data.contains("\"Amoxicillin 500mg, Paracetamol\""));
        assert!(lines.next().is_none());
    }

    #[tokio::test]
    async fn later_appends_do_not_repeat_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prescriptions.csv");
        let ledger = CsvLedger::new(&path);

        ledger.append_record(&record("Sari"), 1).await.unwrap();
        ledger.append_record(&record("Dewi"), 2).await.unwrap();

        // A new instance over the same file keeps appending.
        let reopened = CsvLedger::new(&path);
        reopened.append_record(&record("Ayu"), 3).await.unwrap();

        let rows = reopened.read_all().await.unwrap();
        let patients: Vec<&str> = rows.iter().map(|r| r.patient_name.as_str()).collect();
        assert_eq!(patients, vec!["Sari", "Dewi", "Ayu"]);
        assert_eq!(rows[2].queue, 3);
        assert_eq!(rows[0].patient_phone, "6281234567890");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_keep_rows_intact() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(CsvLedger::new(dir.path().join("rx.csv")));

        let handles: Vec<_> = (1..=25)
            .map(|n| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move { ledger.append_record(&record("P"), n).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut queues: Vec<u32> = ledger
            .read_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.queue)
            .collect();
        queues.sort_unstable();
        assert_eq!(queues, (1..=25).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn read_all_on_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CsvLedger::new(dir.path().join("none.csv"));
        assert!(ledger.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unwritable_path_is_a_ledger_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as the ledger file.
        let ledger = CsvLedger::new(dir.path());
        let err = ledger.append_record(&record("Sari"), 1).await.unwrap_err();
        assert!(matches!(err, RxRelayError::Ledger { .. }), "got {err:?}");
    }
}
