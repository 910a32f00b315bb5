// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message composition from configured templates.

use rxrelay_config::model::TemplatesConfig;
use rxrelay_core::{PrescriptionRecord, QueueAssignment};

/// Numbers medication items in order: `1. A,\n2. B`.
pub fn number_medications(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Substitutes each `{name}` placeholder in `template` in one left-to-right
/// pass. Substituted values are copied verbatim and never re-expanded.
/// Unknown placeholders are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn confirm_prompt(templates: &TemplatesConfig, submission: &str) -> String {
    render(&templates.confirm_prompt, &[("message", submission)])
}

pub fn sheet_link(templates: &TemplatesConfig) -> String {
    render(
        &templates.sheet_link_message,
        &[("link", templates.sheet_link.as_str())],
    )
}

/// The message sent to the pharmacy for one dispatched prescription.
pub fn pharmacy_message(
    templates: &TemplatesConfig,
    record: &PrescriptionRecord,
    queue: QueueAssignment,
) -> String {
    let medication = number_medications(&record.medications);
    let queue = queue.sequence.to_string();
    let phone = record.patient_phone.to_string();
    render(
        &templates.pharmacy_message,
        &[
            ("medication", medication.as_str()),
            ("queue", queue.as_str()),
            ("patient", record.patient_name.as_str()),
            ("birth_date", record.patient_birth_date.as_str()),
            ("phone", phone.as_str()),
            ("doctor", record.doctor_name.as_str()),
        ],
    )
}

pub fn patient_notice(
    templates: &TemplatesConfig,
    record: &PrescriptionRecord,
    queue: QueueAssignment,
) -> String {
    let medication = record.medication_text();
    let queue = queue.sequence.to_string();
    render(
        &templates.patient_notice,
        &[("medication", medication.as_str()), ("queue", queue.as_str())],
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rxrelay_core::PatientPhone;

    use super::*;

    fn record() -> PrescriptionRecord {
        PrescriptionRecord {
            doctor_name: "Budi".into(),
            patient_name: "Sari".into(),
            patient_birth_date: "1990-01-01".into(),
            registry_number: "RM-1".into(),
            medications: vec!["Amoxicillin".into(), "Paracetamol".into()],
            patient_phone: PatientPhone::Unknown,
            payment_method: "Cash".into(),
        }
    }

    fn queue(sequence: u32) -> QueueAssignment {
        QueueAssignment {
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            sequence,
        }
    }

    #[test]
    fn medications_are_numbered_in_order() {
        let items = vec!["Amoxicillin".to_string(), "Paracetamol".to_string()];
        assert_eq!(number_medications(&items), "1. Amoxicillin,\n2. Paracetamol");
        assert_eq!(number_medications(&items[..1]), "1. Amoxicillin");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        assert_eq!(render("{a} and {b}", &[("a", "x")]), "x and {b}");
    }

    #[test]
    fn render_does_not_expand_substituted_values() {
        let text = render("{a}-{b}", &[("a", "{b}"), ("b", "{a}")]);
        assert_eq!(text, "{b}-{a}");
    }

    #[test]
    fn render_handles_stray_braces() {
        assert_eq!(render("{{a}} {", &[("a", "x")]), "{x} {");
        assert_eq!(render("}{a", &[("a", "x")]), "}{a");
    }

    #[test]
    fn placeholders_typed_by_the_doctor_reach_the_pharmacy_verbatim() {
        let mut record = record();
        record.medications = vec!["Vitamin {queue}".into()];
        record.patient_name = "Sari {doctor}".into();

        let text = pharmacy_message(&TemplatesConfig::default(), &record, queue(7));

        assert!(text.contains("1. Vitamin {queue}"), "got: {text}");
        assert!(text.contains("Sari {doctor}\n"), "got: {text}");
        assert!(text.contains("With Queue Number: 7"));
        assert!(text.ends_with("Doctor Budi"));
    }

    #[test]
    fn pharmacy_message_carries_every_detail() {
        let text = pharmacy_message(&TemplatesConfig::default(), &record(), queue(7));
        assert!(text.contains("1. Amoxicillin,\n2. Paracetamol"));
        assert!(text.contains("With Queue Number: 7"));
        assert!(text.contains("Sari\n1990-01-01\n-"));
        assert!(text.ends_with("Doctor Budi"));
    }

    #[test]
    fn patient_notice_mentions_queue_and_medication() {
        let text = patient_notice(&TemplatesConfig::default(), &record(), queue(3));
        assert!(text.contains("Amoxicillin, Paracetamol"));
        assert!(text.contains("queue number is 3"));
    }

    #[test]
    fn confirm_prompt_echoes_submission() {
        let text = confirm_prompt(&TemplatesConfig::default(), "Doctor Name: Budi");
        assert!(text.contains("\n\nDoctor Name: Budi\n\n"));
    }
}
