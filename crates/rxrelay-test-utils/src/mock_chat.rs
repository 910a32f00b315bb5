// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat sender for deterministic testing.
//!
//! `MockChatSender` implements `ChatSender`, capturing every delivered
//! message for assertions. Individual recipients can be marked unreachable,
//! or held so a send stays in flight until the test releases it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify, Semaphore};

use rxrelay_core::{AdapterType, ChatSender, HealthStatus, PluginAdapter, RxRelayError};

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub text: String,
}

/// A send to a held recipient, parked until [`release`](Self::release).
#[derive(Clone)]
pub struct SendHold {
    entered: Arc<Notify>,
    gate: Arc<Semaphore>,
}

impl SendHold {
    fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Wait until a send to the held recipient has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one parked send continue.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

/// A mock chat sender for testing.
#[derive(Default)]
pub struct MockChatSender {
    sent: Mutex<Vec<SentMessage>>,
    unreachable: Mutex<HashSet<String>>,
    failed_attempts: Mutex<Vec<SentMessage>>,
    holds: Mutex<HashMap<String, SendHold>>,
}

impl MockChatSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `recipient` fail until [`restore`](Self::restore).
    pub async fn fail_for(&self, recipient: &str) {
        self.unreachable.lock().await.insert(recipient.to_string());
    }

    pub async fn restore(&self, recipient: &str) {
        self.unreachable.lock().await.remove(recipient);
    }

    /// Park every send to `recipient` until the returned hold releases it.
    pub async fn hold_for(&self, recipient: &str) -> SendHold {
        let hold = SendHold::new();
        self.holds
            .lock()
            .await
            .insert(recipient.to_string(), hold.clone());
        hold
    }

    /// All successfully delivered messages, in send order.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Texts delivered to one recipient, in send order.
    pub async fn sent_to(&self, recipient: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.recipient == recipient)
            .map(|m| m.text.clone())
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Sends that were refused because the recipient was unreachable.
    pub async fn failed_attempts(&self) -> Vec<SentMessage> {
        self.failed_attempts.lock().await.clone()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
        self.failed_attempts.lock().await.clear();
    }
}

#[async_trait]
impl PluginAdapter for MockChatSender {
    fn name(&self) -> &str {
        "mock-chat"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, RxRelayError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RxRelayError> {
        Ok(())
    }
}

#[async_trait]
impl ChatSender for MockChatSender {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), RxRelayError> {
        let message = SentMessage {
            recipient: recipient.to_string(),
            text: text.to_string(),
        };
        let hold = self.holds.lock().await.get(recipient).cloned();
        if let Some(hold) = hold {
            hold.entered.notify_one();
            if let Ok(permit) = hold.gate.acquire().await {
                permit.forget();
            }
        }
        if self.unreachable.lock().await.contains(recipient) {
            self.failed_attempts.lock().await.push(message);
            return Err(RxRelayError::Send {
                recipient: recipient.to_string(),
                message: "mock recipient unreachable".to_string(),
                source: None,
            });
        }
        self.sent.lock().await.push(message);
        Ok(())
    }
}
