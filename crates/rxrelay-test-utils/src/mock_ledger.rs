// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock ledger that keeps appended records in memory.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use rxrelay_core::{
    AdapterType, HealthStatus, Ledger, PluginAdapter, PrescriptionRecord, RxRelayError,
};

#[derive(Default)]
pub struct MockLedger {
    records: Mutex<Vec<(PrescriptionRecord, u32)>>,
    failing: AtomicBool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// While `true`, every append fails and nothing is stored.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Appended records with their queue numbers, in append order.
    pub async fn records(&self) -> Vec<(PrescriptionRecord, u32)> {
        self.records.lock().await.clone()
    }

    pub async fn record_count(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockLedger {
    fn name(&self) -> &str {
        "mock-ledger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, RxRelayError> {
        if self.failing.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("mock ledger failing".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), RxRelayError> {
        Ok(())
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn append_record(
        &self,
        record: &PrescriptionRecord,
        queue_number: u32,
    ) -> Result<(), RxRelayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RxRelayError::Ledger {
                source: Box::new(std::io::Error::other("mock ledger failure")),
            });
        }
        self.records.lock().await.push((record.clone(), queue_number));
        Ok(())
    }
}
