// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Accepted-input grammar for each conversation phase.
//!
//! [`validate`] is pure: it only classifies the text. Acting on the result is
//! the engine's job.

use std::sync::LazyLock;

use regex::Regex;

use crate::extract::{FORM_LABELS, parse_fields};
use crate::store::Phase;

/// Strict fixed-order form grammar, used when the labeled-line map does not
/// find every label (e.g. fields run together on one line).
static FORM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)Doctor Name:\s*(.*?)\s*Patient Name:\s*(.*?)\s*Patient Birth Date:\s*(.*?)\s*Registry Number:\s*(.*?)\s*Medication:\s*(.*?)\s*Patient Phone Number:\s*(.*?)\s*Payment Method:\s*(.*)",
    )
    .unwrap()
});

/// Main menu options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// `1`: fill in a prescription form.
    SendToPharmacy,
    /// `2`: receive the shared spreadsheet link.
    SheetLink,
    /// `3`: end the session.
    Cancel,
}

/// Answer to the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
}

/// What a doctor sent while the form was open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Cancel,
    /// The raw submission text, untrimmed.
    Submission(String),
}

/// A valid input, typed by the phase that accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accepted {
    Start,
    Menu(MenuChoice),
    Form(FormInput),
    Confirmation(Decision),
}

/// An input the current phase does not accept. Each variant maps to its own
/// guidance text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotStart,
    InvalidMenuChoice,
    MalformedForm,
    InvalidConfirmation,
}

/// Classifies `text` against the grammar of `phase`.
pub fn validate(phase: Phase, text: &str) -> Result<Accepted, Rejection> {
    let command = text.trim();
    match phase {
        Phase::AwaitingStart => {
            if command.eq_ignore_ascii_case("/start") {
                Ok(Accepted::Start)
            } else {
                Err(Rejection::NotStart)
            }
        }
        Phase::AwaitingMenuChoice => match command {
            "1" => Ok(Accepted::Menu(MenuChoice::SendToPharmacy)),
            "2" => Ok(Accepted::Menu(MenuChoice::SheetLink)),
            "3" => Ok(Accepted::Menu(MenuChoice::Cancel)),
            _ => Err(Rejection::InvalidMenuChoice),
        },
        Phase::AwaitingFormSubmission => {
            if command.eq_ignore_ascii_case("cancel") {
                Ok(Accepted::Form(FormInput::Cancel))
            } else if is_form_submission(text) {
                Ok(Accepted::Form(FormInput::Submission(text.to_string())))
            } else {
                Err(Rejection::MalformedForm)
            }
        }
        Phase::AwaitingConfirmation => {
            if command.eq_ignore_ascii_case("y") || command.eq_ignore_ascii_case("yes") {
                Ok(Accepted::Confirmation(Decision::Yes))
            } else if command.eq_ignore_ascii_case("n") || command.eq_ignore_ascii_case("no") {
                Ok(Accepted::Confirmation(Decision::No))
            } else {
                Err(Rejection::InvalidConfirmation)
            }
        }
    }
}

/// True when every form label has its own line, in any order, or the text
/// matches the fixed-order pattern. Values may still be blank here; they are
/// checked when the doctor confirms.
pub fn is_form_submission(text: &str) -> bool {
    let fields = parse_fields(text);
    FORM_LABELS.iter().all(|label| fields.contains_key(label)) || FORM_PATTERN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = "Doctor Name: Budi\n\
                        Patient Name: Sari\n\
                        Patient Birth Date: 1990-01-01\n\
                        Registry Number: RM-1\n\
                        Medication: Amoxicillin, Paracetamol\n\
                        Patient Phone Number: -\n\
                        Payment Method: Cash";

    #[test]
    fn start_is_case_insensitive() {
        assert_eq!(validate(Phase::AwaitingStart, "/START"), Ok(Accepted::Start));
        assert_eq!(validate(Phase::AwaitingStart, " /start \n"), Ok(Accepted::Start));
        assert_eq!(validate(Phase::AwaitingStart, "hello"), Err(Rejection::NotStart));
        assert_eq!(validate(Phase::AwaitingStart, "start"), Err(Rejection::NotStart));
    }

    #[test]
    fn menu_accepts_only_three_literals() {
        assert_eq!(
            validate(Phase::AwaitingMenuChoice, "1"),
            Ok(Accepted::Menu(MenuChoice::SendToPharmacy))
        );
        assert_eq!(
            validate(Phase::AwaitingMenuChoice, "2"),
            Ok(Accepted::Menu(MenuChoice::SheetLink))
        );
        assert_eq!(
            validate(Phase::AwaitingMenuChoice, "3"),
            Ok(Accepted::Menu(MenuChoice::Cancel))
        );
        for bad in ["4", "0", "one", "1.", "12", ""] {
            assert_eq!(
                validate(Phase::AwaitingMenuChoice, bad),
                Err(Rejection::InvalidMenuChoice),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn form_accepts_cancel_in_any_case() {
        assert_eq!(
            validate(Phase::AwaitingFormSubmission, "CANCEL"),
            Ok(Accepted::Form(FormInput::Cancel))
        );
    }

    #[test]
    fn form_submission_keeps_raw_text() {
        let raw = format!("  {FORM}\n");
        assert_eq!(
            validate(Phase::AwaitingFormSubmission, &raw),
            Ok(Accepted::Form(FormInput::Submission(raw.clone())))
        );
    }

    #[test]
    fn reordered_form_is_accepted() {
        let reordered: Vec<&str> = FORM.lines().rev().collect();
        assert!(is_form_submission(&reordered.join("\n")));
    }

    #[test]
    fn single_line_form_matches_fixed_order_pattern() {
        let one_line = FORM.replace('\n', " ");
        assert!(is_form_submission(&one_line));
    }

    #[test]
    fn form_missing_a_label_is_rejected() {
        let text = FORM.replace("Registry Number: RM-1\n", "");
        assert_eq!(
            validate(Phase::AwaitingFormSubmission, &text),
            Err(Rejection::MalformedForm)
        );
        assert_eq!(
            validate(Phase::AwaitingFormSubmission, "hi there"),
            Err(Rejection::MalformedForm)
        );
    }

    #[test]
    fn confirmation_normalizes_yes_and_no() {
        for yes in ["y", "Y", "yes", "YES", " Yes "] {
            assert_eq!(
                validate(Phase::AwaitingConfirmation, yes),
                Ok(Accepted::Confirmation(Decision::Yes))
            );
        }
        for no in ["n", "N", "no", "NO"] {
            assert_eq!(
                validate(Phase::AwaitingConfirmation, no),
                Ok(Accepted::Confirmation(Decision::No))
            );
        }
        assert_eq!(
            validate(Phase::AwaitingConfirmation, "maybe"),
            Err(Rejection::InvalidConfirmation)
        );
    }
}
