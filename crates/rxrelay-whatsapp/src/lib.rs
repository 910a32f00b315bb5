// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp chat gateway adapter for RxRelay.
//!
//! Implements [`ChatSender`] on top of a go-whatsapp-web style REST gateway:
//! `POST {api_url}/send/message` with a `{"phone", "message"}` JSON body.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use rxrelay_config::model::WhatsAppConfig;
use rxrelay_core::{AdapterType, ChatSender, HealthStatus, PluginAdapter, RxRelayError};
use tracing::{debug, info};

use crate::client::WhatsAppClient;

/// Outbound WhatsApp messages through the chat gateway.
#[derive(Debug, Clone)]
pub struct WhatsAppSender {
    client: WhatsAppClient,
}

impl WhatsAppSender {
    pub fn new(config: &WhatsAppConfig) -> Result<Self, RxRelayError> {
        let client = WhatsAppClient::new(
            &config.api_url,
            &config.username,
            &config.password,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(api_url = %client.base_url(), "WhatsApp sender initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for WhatsAppSender {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, RxRelayError> {
        match self.client.ping().await {
            Ok(status) if status.is_server_error() => Ok(HealthStatus::Degraded(format!(
                "gateway returned {status}"
            ))),
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), RxRelayError> {
        Ok(())
    }
}

#[async_trait]
impl ChatSender for WhatsAppSender {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), RxRelayError> {
        debug!(recipient, len = text.len(), "sending WhatsApp message");
        self.client.send_message(recipient, text).await
    }
}
