// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the conversation engine and its adapters.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of outbound adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Chat,
    Ledger,
}

/// A text message delivered by the chat gateway webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender phone identifier as reported by the gateway.
    pub sender_id: String,
    /// Raw message text, untrimmed.
    pub text: String,
}

impl InboundMessage {
    pub fn new(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            text: text.into(),
        }
    }
}

/// The patient's contact number, or the explicit "no phone given" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientPhone {
    /// A normalized phone number in gateway wire format.
    Number(String),
    /// The doctor left the phone field blank or entered `-`.
    Unknown,
}

impl PatientPhone {
    /// Wire form of the sentinel, as typed by doctors and stored in the ledger.
    pub const UNKNOWN_SENTINEL: &'static str = "-";

    /// Returns the number when one is known.
    pub fn number(&self) -> Option<&str> {
        match self {
            PatientPhone::Number(n) => Some(n),
            PatientPhone::Unknown => None,
        }
    }
}

impl fmt::Display for PatientPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientPhone::Number(n) => f.write_str(n),
            PatientPhone::Unknown => f.write_str(Self::UNKNOWN_SENTINEL),
        }
    }
}

/// A structured prescription request extracted from a confirmed submission.
///
/// Every text field is non-empty; only the patient phone may carry the
/// [`PatientPhone::Unknown`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    pub doctor_name: String,
    pub patient_name: String,
    pub patient_birth_date: String,
    pub registry_number: String,
    /// Medication items in the order the doctor wrote them.
    pub medications: Vec<String>,
    pub patient_phone: PatientPhone,
    pub payment_method: String,
}

impl PrescriptionRecord {
    /// The medication list as a single comma-separated field, for tabular logs.
    pub fn medication_text(&self) -> String {
        self.medications.join(", ")
    }
}

/// A queue number issued for one confirmed prescription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueAssignment {
    /// Local calendar date the number belongs to.
    pub date: NaiveDate,
    /// 1-based position within that date.
    pub sequence: u32,
}
