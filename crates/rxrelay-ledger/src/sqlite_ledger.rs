// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite prescription ledger.
//!
//! All operations go through the single tokio-rusqlite background thread.

use async_trait::async_trait;
use rxrelay_core::{
    AdapterType, HealthStatus, Ledger, PluginAdapter, PrescriptionRecord, RxRelayError,
};
use tracing::{debug, info};

use crate::row::LedgerRow;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS prescriptions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    queue INTEGER NOT NULL,
    doctor_name TEXT NOT NULL,
    patient_name TEXT NOT NULL,
    patient_birth_date TEXT NOT NULL,
    registry_number TEXT NOT NULL,
    medication TEXT NOT NULL,
    patient_phone TEXT NOT NULL,
    payment_method TEXT NOT NULL,
    recorded_at TEXT NOT NULL
)";

/// Convert a tokio-rusqlite error into `RxRelayError::Ledger`.
fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> RxRelayError {
    RxRelayError::Ledger {
        source: Box::new(e),
    }
}

/// Persistent prescription ledger backed by SQLite.
pub struct SqliteLedger {
    conn: tokio_rusqlite::Connection,
}

impl SqliteLedger {
    /// Open (or create) the database at `path` and ensure the
    /// `prescriptions` table exists.
    pub async fn open(path: &str) -> Result<Self, RxRelayError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| RxRelayError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| RxRelayError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn.execute(CREATE_TABLE, [])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        info!(path, "SQLite ledger opened");
        Ok(Self { conn })
    }

    /// Number of stored rows.
    pub async fn count(&self) -> Result<u64, RxRelayError> {
        self.conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM prescriptions", [], |row| row.get(0))?;
                Ok(count.max(0) as u64)
            })
            .await
            .map_err(map_tr_err)
    }

    /// The most recent `limit` rows, newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<LedgerRow>, RxRelayError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT queue, doctor_name, patient_name, patient_birth_date, \
                     registry_number, medication, patient_phone, payment_method, recorded_at \
                     FROM prescriptions ORDER BY id DESC LIMIT ?1",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![limit], |row| {
                        Ok(LedgerRow {
                            queue: row.get(0)?,
                            doctor_name: row.get(1)?,
                            patient_name: row.get(2)?,
                            patient_birth_date: row.get(3)?,
                            registry_number: row.get(4)?,
                            medication: row.get(5)?,
                            patient_phone: row.get(6)?,
                            payment_method: row.get(7)?,
                            recorded_at: row.get(8)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteLedger {
    fn name(&self) -> &str {
        "sqlite-ledger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, RxRelayError> {
        match self
            .conn
            .call(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
        {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), RxRelayError> {
        Ok(())
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn append_record(
        &self,
        record: &PrescriptionRecord,
        queue_number: u32,
    ) -> Result<(), RxRelayError> {
        let row = LedgerRow::new(record, queue_number);
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO prescriptions (queue, doctor_name, patient_name, \
                     patient_birth_date, registry_number, medication, patient_phone, \
                     payment_method, recorded_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    rusqlite::params![
                        row.queue,
                        row.doctor_name,
                        row.patient_name,
                        row.patient_birth_date,
                        row.registry_number,
                        row.medication,
                        row.patient_phone,
                        row.payment_method,
                        row.recorded_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        debug!(queue_number, "record appended to SQLite ledger");
        Ok(())
    }
}
