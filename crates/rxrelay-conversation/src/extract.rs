// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Labeled-line field extraction for prescription submissions.
//!
//! A submission is a block of `Label: value` lines. Each line is split at its
//! first colon; lines without a colon are ignored and a repeated label keeps
//! its last value. Label order does not matter.

use std::collections::HashMap;

use rxrelay_core::{PrescriptionRecord, RxRelayError};

use crate::phone::PhoneNormalizer;

pub const DOCTOR_NAME: &str = "Doctor Name";
pub const PATIENT_NAME: &str = "Patient Name";
pub const PATIENT_BIRTH_DATE: &str = "Patient Birth Date";
pub const REGISTRY_NUMBER: &str = "Registry Number";
pub const MEDICATION: &str = "Medication";
pub const PATIENT_PHONE_NUMBER: &str = "Patient Phone Number";
pub const PAYMENT_METHOD: &str = "Payment Method";

/// Every form label, in the order the blank form lists them.
pub const FORM_LABELS: [&str; 7] = [
    DOCTOR_NAME,
    PATIENT_NAME,
    PATIENT_BIRTH_DATE,
    REGISTRY_NUMBER,
    MEDICATION,
    PATIENT_PHONE_NUMBER,
    PAYMENT_METHOD,
];

/// Builds the key→value map for a submission. Keys and values are trimmed.
pub fn parse_fields(text: &str) -> HashMap<&str, &str> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

/// Splits a medication field on commas, dropping blank items.
pub fn split_medications(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turns a submission into a [`PrescriptionRecord`].
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    normalizer: PhoneNormalizer,
}

impl FieldExtractor {
    pub fn new(normalizer: PhoneNormalizer) -> Self {
        Self { normalizer }
    }

    /// Extracts a record, requiring every label except the patient phone to
    /// carry a non-empty value. A blank, `-` or digit-less phone becomes
    /// [`PatientPhone::Unknown`](rxrelay_core::PatientPhone::Unknown).
    ///
    /// Fails with [`RxRelayError::MissingFields`] naming every absent label.
    pub fn extract(&self, text: &str) -> Result<PrescriptionRecord, RxRelayError> {
        let fields = parse_fields(text);
        let value = |label: &str| fields.get(label).copied().unwrap_or_default();

        let medications = split_medications(value(MEDICATION));

        let missing: Vec<String> = FORM_LABELS
            .iter()
            .filter(|&&label| match label {
                PATIENT_PHONE_NUMBER => false,
                MEDICATION => medications.is_empty(),
                _ => value(label).is_empty(),
            })
            .map(|label| label.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(RxRelayError::MissingFields { fields: missing });
        }

        Ok(PrescriptionRecord {
            doctor_name: value(DOCTOR_NAME).to_string(),
            patient_name: value(PATIENT_NAME).to_string(),
            patient_birth_date: value(PATIENT_BIRTH_DATE).to_string(),
            registry_number: value(REGISTRY_NUMBER).to_string(),
            medications,
            patient_phone: self.normalizer.patient_phone(value(PATIENT_PHONE_NUMBER)),
            payment_method: value(PAYMENT_METHOD).to_string(),
        })
    }
}
