// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation testing.
//!
//! `TestHarness` assembles a [`ConversationEngine`] with mock adapters, a
//! fresh store, and a queue counter driven by a [`ManualClock`]. Provides
//! `send()` to push messages through the full state machine.

use std::sync::Arc;

use chrono::NaiveDate;
use rxrelay_config::model::{RxRelayConfig, TemplatesConfig};
use rxrelay_conversation::{
    ConversationEngine, ConversationStore, HandleOutcome, ManualClock, Phase, QueueCounter,
};
use rxrelay_core::{InboundMessage, RxRelayError};

use crate::mock_chat::MockChatSender;
use crate::mock_ledger::MockLedger;

/// Sender id of the doctor the harness authorizes by default.
pub const DOCTOR: &str = "6281100000001";

/// Pharmacy number configured by default.
pub const PHARMACY: &str = "6281200000000";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    allowed_senders: Vec<String>,
    pharmacy_number: String,
    templates: TemplatesConfig,
    date: NaiveDate,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            allowed_senders: vec![DOCTOR.to_string()],
            pharmacy_number: PHARMACY.to_string(),
            templates: TemplatesConfig::default(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap_or(NaiveDate::MIN),
        }
    }

    /// Authorize an additional sender.
    pub fn with_allowed_sender(mut self, sender: &str) -> Self {
        self.allowed_senders.push(sender.to_string());
        self
    }

    pub fn with_pharmacy_number(mut self, number: &str) -> Self {
        self.pharmacy_number = number.to_string();
        self
    }

    pub fn with_templates(mut self, templates: TemplatesConfig) -> Self {
        self.templates = templates;
        self
    }

    /// Start the manual clock on `date`.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn build(self) -> TestHarness {
        let mut config = RxRelayConfig::default();
        config.bot.allowed_senders = self.allowed_senders;
        config.whatsapp.pharmacy_number = self.pharmacy_number;
        config.templates = self.templates;

        let chat = Arc::new(MockChatSender::new());
        let ledger = Arc::new(MockLedger::new());
        let clock = Arc::new(ManualClock::new(self.date));
        let store = Arc::new(ConversationStore::new());
        let counter = Arc::new(QueueCounter::new(clock.clone()));

        let engine = Arc::new(ConversationEngine::new(
            &config,
            chat.clone(),
            ledger.clone(),
            store.clone(),
            counter.clone(),
        ));

        TestHarness {
            engine,
            chat,
            ledger,
            clock,
            store,
            counter,
            config,
        }
    }
}

/// A complete conversation stack over mock adapters.
pub struct TestHarness {
    pub engine: Arc<ConversationEngine>,
    pub chat: Arc<MockChatSender>,
    pub ledger: Arc<MockLedger>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<ConversationStore>,
    pub counter: Arc<QueueCounter>,
    pub config: RxRelayConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Send `text` as the default [`DOCTOR`].
    pub async fn send(&self, text: &str) -> Result<HandleOutcome, RxRelayError> {
        self.send_from(DOCTOR, text).await
    }

    pub async fn send_from(&self, sender: &str, text: &str) -> Result<HandleOutcome, RxRelayError> {
        self.engine
            .handle_message(&InboundMessage::new(sender, text))
            .await
    }

    /// Current phase of the default doctor's conversation.
    pub async fn phase(&self) -> Phase {
        self.store.get_or_create(DOCTOR).await.phase
    }

    /// Texts sent to the default doctor so far.
    pub async fn replies(&self) -> Vec<String> {
        self.chat.sent_to(DOCTOR).await
    }

    /// The most recent text sent to the default doctor.
    pub async fn last_reply(&self) -> Option<String> {
        self.replies().await.pop()
    }

    /// Drive the default doctor from a fresh session to the confirmation
    /// prompt with `form` as the held submission.
    pub async fn submit_form(&self, form: &str) -> Result<HandleOutcome, RxRelayError> {
        self.send("/start").await?;
        self.send("1").await?;
        self.send(form).await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
