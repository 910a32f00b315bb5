// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the WhatsApp chat gateway.
//!
//! Every request carries basic-auth credentials. A send succeeds only on
//! HTTP 200; there is no retry.

use std::time::Duration;

use reqwest::StatusCode;
use rxrelay_core::RxRelayError;
use tracing::debug;

use crate::types::{GatewayResponse, SendMessageRequest};

#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl WhatsAppClient {
    /// Creates a client for the gateway at `base_url`.
    pub fn new(
        base_url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, RxRelayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RxRelayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST {base_url}/send/message`.
    pub async fn send_message(&self, phone: &str, message: &str) -> Result<(), RxRelayError> {
        let url = format!("{}/send/message", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&SendMessageRequest { phone, message })
            .send()
            .await
            .map_err(|e| RxRelayError::Send {
                recipient: phone.to_string(),
                message: format!("request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status != StatusCode::OK {
            return Err(RxRelayError::Send {
                recipient: phone.to_string(),
                message: format!("gateway returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: GatewayResponse = serde_json::from_str(&body).unwrap_or_default();
        debug!(
            recipient = phone,
            code = %parsed.code,
            message = %parsed.message,
            "message accepted by gateway"
        );
        Ok(())
    }

    /// Checks the gateway answers at all. Any HTTP status counts as reachable.
    pub async fn ping(&self) -> Result<StatusCode, RxRelayError> {
        self.client
            .get(&self.base_url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map(|r| r.status())
            .map_err(|e| RxRelayError::Send {
                recipient: self.base_url.clone(),
                message: format!("gateway unreachable: {e}"),
                source: Some(Box::new(e)),
            })
    }
}
