// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-doctor conversation state, keyed by sender phone number.
//!
//! Entries are created lazily on first contact and live for the process
//! lifetime. All access goes through one mutex over the whole map; no
//! operation holds it across an await point.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// Phases of a doctor's conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Waiting for `/start`.
    #[default]
    AwaitingStart,
    /// Menu sent, waiting for `1`, `2` or `3`.
    AwaitingMenuChoice,
    /// Blank form sent, waiting for a filled form or `cancel`.
    AwaitingFormSubmission,
    /// Submission echoed back, waiting for `Y` or `N`.
    AwaitingConfirmation,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::AwaitingStart => write!(f, "awaiting_start"),
            Phase::AwaitingMenuChoice => write!(f, "awaiting_menu_choice"),
            Phase::AwaitingFormSubmission => write!(f, "awaiting_form_submission"),
            Phase::AwaitingConfirmation => write!(f, "awaiting_confirmation"),
        }
    }
}

/// One doctor's conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub phase: Phase,
    /// Raw submission held between form submission and confirmation.
    pub pending_message: String,
}

/// Concurrency-safe map from sender phone number to [`ConversationState`].
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: Mutex<HashMap<String, ConversationState>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the sender's state, inserting a fresh one first
    /// if the sender has never been seen.
    pub async fn get_or_create(&self, phone: &str) -> ConversationState {
        let mut entries = self.entries.lock().await;
        entries.entry(phone.to_string()).or_default().clone()
    }

    /// Replaces the sender's state with a fresh [`Phase::AwaitingStart`] entry.
    pub async fn reset(&self, phone: &str) {
        let mut entries = self.entries.lock().await;
        entries.insert(phone.to_string(), ConversationState::default());
    }

    /// Applies `f` to the sender's state under the store lock, creating the
    /// entry if needed, and returns whatever `f` returns.
    pub async fn update<R>(&self, phone: &str, f: impl FnOnce(&mut ConversationState) -> R) -> R {
        let mut entries = self.entries.lock().await;
        f(entries.entry(phone.to_string()).or_default())
    }

    /// Number of known senders.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
