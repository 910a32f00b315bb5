// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flat row shape shared by every ledger backend.

use rxrelay_core::PrescriptionRecord;
use serde::{Deserialize, Serialize};

/// Column names, in file order.
pub const COLUMNS: [&str; 9] = [
    "queue",
    "doctor_name",
    "patient_name",
    "patient_birth_date",
    "registry_number",
    "medication",
    "patient_phone",
    "payment_method",
    "recorded_at",
];

/// One dispatched prescription as stored in a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub queue: u32,
    pub doctor_name: String,
    pub patient_name: String,
    pub patient_birth_date: String,
    pub registry_number: String,
    /// Medication items joined with `", "`.
    pub medication: String,
    /// Normalized number, or `-` when unknown.
    pub patient_phone: String,
    pub payment_method: String,
    /// RFC 3339 local timestamp of the append.
    pub recorded_at: String,
}

impl LedgerRow {
    pub fn new(record: &PrescriptionRecord, queue: u32) -> Self {
        Self {
            queue,
            doctor_name: record.doctor_name.clone(),
            patient_name: record.patient_name.clone(),
            patient_birth_date: record.patient_birth_date.clone(),
            registry_number: record.registry_number.clone(),
            medication: record.medication_text(),
            patient_phone: record.patient_phone.to_string(),
            payment_method: record.payment_method.clone(),
            recorded_at: chrono::Local::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rxrelay_core::PatientPhone;

    use super::*;

    #[test]
    fn row_flattens_record() {
        let record = PrescriptionRecord {
            doctor_name: "Budi".into(),
            patient_name: "Sari".into(),
            patient_birth_date: "1990-01-01".into(),
            registry_number: "RM-1".into(),
            medications: vec!["Amoxicillin".into(), "Paracetamol".into()],
            patient_phone: PatientPhone::Unknown,
            payment_method: "Cash".into(),
        };
        let row = LedgerRow::new(&record, 4);
        assert_eq!(row.queue, 4);
        assert_eq!(row.medication, "Amoxicillin, Paracetamol");
        assert_eq!(row.patient_phone, "-");
        assert!(chrono::DateTime::parse_from_rfc3339(&row.recorded_at).is_ok());
    }
}
