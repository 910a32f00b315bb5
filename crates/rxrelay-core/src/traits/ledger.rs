// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger port for the durable prescription log (spreadsheet, CSV, SQLite).

use async_trait::async_trait;

use crate::error::RxRelayError;
use crate::traits::adapter::PluginAdapter;
use crate::types::PrescriptionRecord;

/// Append-only log of dispatched prescriptions.
#[async_trait]
pub trait Ledger: PluginAdapter {
    /// Appends one record together with its queue number.
    async fn append_record(
        &self,
        record: &PrescriptionRecord,
        queue_number: u32,
    ) -> Result<(), RxRelayError>;
}
