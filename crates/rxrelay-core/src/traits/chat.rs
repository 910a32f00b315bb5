// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat sender port for delivering text to doctors, the pharmacy, and patients.

use async_trait::async_trait;

use crate::error::RxRelayError;
use crate::traits::adapter::PluginAdapter;

/// Outbound chat delivery.
///
/// `recipient` is a phone-number identifier in the gateway's wire format.
/// Any transport failure or non-success response is reported as
/// [`RxRelayError::Send`].
#[async_trait]
pub trait ChatSender: PluginAdapter {
    /// Sends `text` to `recipient`.
    async fn send(&self, recipient: &str, text: &str) -> Result<(), RxRelayError>;
}
