// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonicalizes free-form phone numbers into the chat gateway's wire format.
//!
//! No length or plausibility checks are made: anything that is not the
//! "no phone" sentinel normalizes to a best-effort digit string.

use rxrelay_config::model::PhoneConfig;
use rxrelay_core::PatientPhone;

/// The "no phone given" sentinel, both as input and output.
pub const NO_PHONE: &str = "-";

/// Rewrites national and bare subscriber numbers to international form.
#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    country_code: String,
    trunk_prefix: String,
    subscriber_prefix: String,
}

impl PhoneNormalizer {
    pub fn new(config: &PhoneConfig) -> Self {
        Self {
            country_code: config.country_code.clone(),
            trunk_prefix: config.trunk_prefix.clone(),
            subscriber_prefix: config.subscriber_prefix.clone(),
        }
    }

    /// Strips every non-digit and applies prefix rewriting.
    ///
    /// Empty input, a lone `-`, or input with no digits at all yields [`NO_PHONE`].
    pub fn normalize(&self, raw: &str) -> String {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return NO_PHONE.to_string();
        }

        if let Some(national) = digits.strip_prefix(self.trunk_prefix.as_str()) {
            format!("{}{national}", self.country_code)
        } else if digits.starts_with(&self.country_code) {
            digits
        } else if digits.starts_with(&self.subscriber_prefix) {
            format!("{}{digits}", self.country_code)
        } else {
            digits
        }
    }

    /// Normalizes a form value into a [`PatientPhone`].
    pub fn patient_phone(&self, raw: &str) -> PatientPhone {
        match self.normalize(raw) {
            n if n == NO_PHONE => PatientPhone::Unknown,
            n => PatientPhone::Number(n),
        }
    }
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::new(&PhoneConfig::default())
    }
}
