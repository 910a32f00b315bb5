// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the chat gateway REST API.

use serde::{Deserialize, Serialize};

/// Body of `POST /send/message`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub phone: &'a str,
    pub message: &'a str,
}

/// Response envelope returned by the gateway. Only used for logging; a
/// delivery is judged by HTTP status alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayResponse {
    #[serde(default)]
    pub code: serde_json::Value,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub results: Option<serde_json::Value>,
}
