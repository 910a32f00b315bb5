// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Doctor-to-pharmacy conversation core for RxRelay.
//!
//! Turns a stream of chat messages from doctors into validated prescription
//! records with daily queue numbers, and hands them to the chat and ledger
//! ports defined in `rxrelay-core`.

pub mod clock;
pub mod engine;
pub mod extract;
pub mod format;
pub mod metrics;
pub mod phone;
pub mod queue;
pub mod store;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{ConversationEngine, HandleOutcome};
pub use extract::FieldExtractor;
pub use phone::PhoneNormalizer;
pub use queue::QueueCounter;
pub use store::{ConversationState, ConversationStore, Phase};
