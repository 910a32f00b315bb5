// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-doctor conversation state machine.
//!
//! Phases run AwaitingStart -> AwaitingMenuChoice -> AwaitingFormSubmission
//! -> AwaitingConfirmation and back to AwaitingStart once a prescription is
//! dispatched, cancelled, or abandoned.
//!
//! Confirming a submission runs the dispatch procedure:
//! - **Parse**: re-extract the held submission; failure returns the doctor to
//!   the form without consuming a queue number
//! - **Number**: issue the next global queue number
//! - **Record**: append to the ledger; failure only warns the doctor
//! - **Notify**: message the pharmacy (fatal on failure), then the patient
//!   (best effort)

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use rxrelay_config::model::{RxRelayConfig, TemplatesConfig};
use rxrelay_core::{ChatSender, InboundMessage, Ledger, QueueAssignment, RxRelayError};
use tracing::{debug, error, info, warn};

use crate::extract::FieldExtractor;
use crate::format;
use crate::metrics;
use crate::phone::PhoneNormalizer;
use crate::queue::QueueCounter;
use crate::store::{ConversationStore, Phase};
use crate::validator::{self, Accepted, Decision, FormInput, MenuChoice, Rejection};

/// What handling one inbound message amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Dropped before the state machine: empty text or unknown sender.
    Ignored,
    /// The input did not fit the current phase; guidance was sent.
    Rejected { phase: Phase },
    /// The conversation moved between phases (possibly to the same one).
    Transitioned { from: Phase, to: Phase },
    /// A confirmed prescription reached the pharmacy.
    Dispatched(QueueAssignment),
}

impl HandleOutcome {
    fn label(&self) -> &'static str {
        match self {
            HandleOutcome::Ignored => "ignored",
            HandleOutcome::Rejected { .. } => "rejected",
            HandleOutcome::Transitioned { .. } => "transitioned",
            HandleOutcome::Dispatched(_) => "dispatched",
        }
    }
}

/// Drives every doctor's conversation.
///
/// Cheap to share behind an `Arc`; all mutable state lives in the
/// [`ConversationStore`] and [`QueueCounter`].
pub struct ConversationEngine {
    templates: TemplatesConfig,
    allowed_senders: HashSet<String>,
    pharmacy_number: String,
    extractor: FieldExtractor,
    sender: Arc<dyn ChatSender>,
    ledger: Arc<dyn Ledger>,
    store: Arc<ConversationStore>,
    counter: Arc<QueueCounter>,
}

impl ConversationEngine {
    pub fn new(
        config: &RxRelayConfig,
        sender: Arc<dyn ChatSender>,
        ledger: Arc<dyn Ledger>,
        store: Arc<ConversationStore>,
        counter: Arc<QueueCounter>,
    ) -> Self {
        Self {
            templates: config.templates.clone(),
            allowed_senders: config.bot.allowed_senders.iter().cloned().collect(),
            pharmacy_number: config.whatsapp.pharmacy_number.clone(),
            extractor: FieldExtractor::new(PhoneNormalizer::new(&config.phone)),
            sender,
            ledger,
            store,
            counter,
        }
    }

    pub fn is_authorized(&self, sender_id: &str) -> bool {
        self.allowed_senders.contains(sender_id)
    }

    /// Handles one inbound message end to end.
    ///
    /// Returns `Err(MissingFields)` when a confirmed submission cannot be
    /// parsed and `Err(Send)` when the pharmacy could not be notified. Both are
    /// already reported to the doctor; the error is for the caller's logs.
    pub async fn handle_message(
        &self,
        message: &InboundMessage,
    ) -> Result<HandleOutcome, RxRelayError> {
        let result = self.route(message).await;
        match &result {
            Ok(outcome) => metrics::record_message(outcome.label()),
            Err(_) => metrics::record_message("failed"),
        }
        result
    }

    async fn route(&self, message: &InboundMessage) -> Result<HandleOutcome, RxRelayError> {
        let sender = message.sender_id.as_str();

        if message.text.trim().is_empty() {
            debug!(sender, "ignoring message without text");
            return Ok(HandleOutcome::Ignored);
        }
        if !self.is_authorized(sender) {
            debug!(sender, "ignoring message from unauthorized sender");
            return Ok(HandleOutcome::Ignored);
        }

        let state = self.store.get_or_create(sender).await;
        metrics::set_known_senders(self.store.len().await);
        let from = state.phase;

        let accepted = match validator::validate(from, &message.text) {
            Ok(accepted) => accepted,
            Err(rejection) => {
                debug!(sender, phase = %from, ?rejection, "input rejected");
                self.reply(sender, self.rejection_text(rejection)).await;
                return Ok(HandleOutcome::Rejected { phase: from });
            }
        };

        let to = match accepted {
            Accepted::Start => {
                self.enter(sender, Phase::AwaitingMenuChoice).await;
                self.reply(sender, &self.templates.menu).await;
                Phase::AwaitingMenuChoice
            }
            Accepted::Menu(MenuChoice::SendToPharmacy) => {
                self.enter(sender, Phase::AwaitingFormSubmission).await;
                self.reply(sender, &self.templates.form).await;
                Phase::AwaitingFormSubmission
            }
            Accepted::Menu(MenuChoice::SheetLink) => {
                self.store.reset(sender).await;
                self.reply(sender, &format::sheet_link(&self.templates)).await;
                self.reply(sender, &self.templates.session_complete).await;
                Phase::AwaitingStart
            }
            Accepted::Menu(MenuChoice::Cancel) => {
                self.store.reset(sender).await;
                self.reply(sender, &self.templates.session_cancelled).await;
                Phase::AwaitingStart
            }
            Accepted::Form(FormInput::Cancel) => {
                self.enter(sender, Phase::AwaitingMenuChoice).await;
                self.reply(sender, &self.templates.form_cancelled).await;
                Phase::AwaitingMenuChoice
            }
            Accepted::Form(FormInput::Submission(raw)) => {
                let prompt = format::confirm_prompt(&self.templates, &raw);
                self.store
                    .update(sender, |s| {
                        s.phase = Phase::AwaitingConfirmation;
                        s.pending_message = raw;
                    })
                    .await;
                self.reply(sender, &prompt).await;
                Phase::AwaitingConfirmation
            }
            Accepted::Confirmation(Decision::No) => {
                self.enter(sender, Phase::AwaitingFormSubmission).await;
                self.reply(sender, &self.templates.resubmit_form).await;
                self.reply(sender, &self.templates.form).await;
                Phase::AwaitingFormSubmission
            }
            Accepted::Confirmation(Decision::Yes) => return self.confirm_and_dispatch(sender).await,
        };

        debug!(sender, from = %from, to = %to, "conversation advanced");
        Ok(HandleOutcome::Transitioned { from, to })
    }

    async fn confirm_and_dispatch(&self, sender: &str) -> Result<HandleOutcome, RxRelayError> {
        let started = Instant::now();

        // Claim and parse the held submission in one update. The phase set
        // here is final: the network steps below never touch the store.
        let extractor = &self.extractor;
        let claimed = self
            .store
            .update(sender, |s| {
                if s.phase != Phase::AwaitingConfirmation {
                    return None;
                }
                let pending = std::mem::take(&mut s.pending_message);
                let parsed = extractor.extract(&pending);
                s.phase = match parsed {
                    Ok(_) => Phase::AwaitingStart,
                    Err(_) => Phase::AwaitingFormSubmission,
                };
                Some(parsed)
            })
            .await;

        let record = match claimed {
            None => {
                debug!(sender, "confirmation already handled");
                return Ok(HandleOutcome::Ignored);
            }
            Some(Ok(record)) => record,
            Some(Err(e)) => {
                warn!(sender, error = %e, "confirmed submission could not be parsed");
                metrics::record_dispatch_failure("parse");
                self.reply(sender, &self.templates.malformed_submission).await;
                self.reply(sender, &self.templates.form).await;
                return Err(e);
            }
        };

        let queue = self.counter.issue_next().await;
        metrics::set_queue_number(queue.sequence);
        info!(
            queue_number = queue.sequence,
            doctor = %record.doctor_name,
            "queue number issued"
        );

        if let Err(e) = self.ledger.append_record(&record, queue.sequence).await {
            warn!(queue_number = queue.sequence, error = %e, "ledger append failed, dispatching anyway");
            metrics::record_dispatch_failure("ledger");
            self.reply(sender, &self.templates.ledger_failed).await;
        }

        let to_pharmacy = format::pharmacy_message(&self.templates, &record, queue);
        if let Err(e) = self.sender.send(&self.pharmacy_number, &to_pharmacy).await {
            error!(queue_number = queue.sequence, error = %e, "pharmacy notification failed");
            metrics::record_dispatch_failure("pharmacy");
            self.reply(sender, &self.templates.pharmacy_failed).await;
            return Err(e);
        }

        if let Some(patient) = record.patient_phone.number() {
            let notice = format::patient_notice(&self.templates, &record, queue);
            if let Err(e) = self.sender.send(patient, &notice).await {
                debug!(queue_number = queue.sequence, error = %e, "patient notice not delivered");
                metrics::record_dispatch_failure("patient");
            }
        }

        self.reply(sender, &self.templates.dispatched).await;

        metrics::record_dispatched();
        metrics::record_dispatch_latency(started.elapsed().as_secs_f64());
        info!(
            queue_number = queue.sequence,
            doctor = %record.doctor_name,
            "prescription dispatched"
        );
        Ok(HandleOutcome::Dispatched(queue))
    }

    /// Moves the sender to `phase`, dropping any held submission.
    async fn enter(&self, sender: &str, phase: Phase) {
        self.store
            .update(sender, |s| {
                s.phase = phase;
                s.pending_message.clear();
            })
            .await;
    }

    /// Sends a conversational reply. Delivery failures are logged only.
    async fn reply(&self, to: &str, text: &str) {
        if let Err(e) = self.sender.send(to, text).await {
            warn!(recipient = to, error = %e, "reply not delivered");
        }
    }

    fn rejection_text(&self, rejection: Rejection) -> &str {
        match rejection {
            Rejection::NotStart => &self.templates.reject_start,
            Rejection::InvalidMenuChoice => &self.templates.reject_menu,
            Rejection::MalformedForm => &self.templates.reject_form,
            Rejection::InvalidConfirmation => &self.templates.reject_confirmation,
        }
    }
}

impl std::fmt::Debug for ConversationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationEngine")
            .field("allowed_senders", &self.allowed_senders.len())
            .field("pharmacy_number", &self.pharmacy_number)
            .finish_non_exhaustive()
    }
}
