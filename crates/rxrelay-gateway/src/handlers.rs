// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Every JSON response uses the chat gateway's `{code, message, data}`
//! envelope.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rxrelay_core::{ChatSender, InboundMessage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::server::GatewayState;

/// Delivery posted by the chat gateway for every received message.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WebhookPayload {
    pub chat_id: String,
    pub from: String,
    pub message: WebhookMessage,
    pub pushname: String,
    /// Phone number of the sender; the conversation key.
    pub sender_id: String,
    pub timestamp: String,
}

/// The message body inside a [`WebhookPayload`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WebhookMessage {
    pub text: String,
    pub id: String,
    pub replied_id: String,
    pub quoted_message: String,
}

impl From<WebhookPayload> for InboundMessage {
    fn from(payload: WebhookPayload) -> Self {
        InboundMessage::new(payload.sender_id, payload.message.text)
    }
}

/// Request body for `POST /v1/messages/send`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub phone_number: String,
    pub message: String,
}

/// Response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    fn reply(status: StatusCode, message: impl Into<String>) -> Response {
        let body = ApiResponse {
            code: status.as_u16(),
            message: message.into(),
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST {webhook_path}
///
/// Acknowledges the delivery at once and runs the conversation on a
/// tracked task.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "invalid webhook payload");
            return ApiResponse::reply(
                StatusCode::BAD_REQUEST,
                format!("Invalid webhook payload: {}", rejection.body_text()),
            );
        }
    };

    debug!(
        sender = %payload.sender_id,
        chat_id = %payload.chat_id,
        message_id = %payload.message.id,
        "webhook received"
    );

    let message = InboundMessage::from(payload);
    let engine = state.engine.clone();
    state.tasks.spawn(async move {
        match engine.handle_message(&message).await {
            Ok(outcome) => debug!(sender = %message.sender_id, ?outcome, "message handled"),
            Err(e) => warn!(sender = %message.sender_id, error = %e, "message handling failed"),
        }
    });

    ApiResponse::reply(StatusCode::OK, "OK")
}

/// POST /v1/messages/send
///
/// Relays one message through the chat sender. Behind bearer auth.
pub async fn post_send(
    State(state): State<GatewayState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return ApiResponse::reply(StatusCode::BAD_REQUEST, "Invalid request body");
    };

    if request.phone_number.trim().is_empty() || request.message.trim().is_empty() {
        return ApiResponse::reply(
            StatusCode::BAD_REQUEST,
            "phone_number and message are required",
        );
    }

    match state
        .sender
        .send(&request.phone_number, &request.message)
        .await
    {
        Ok(()) => {
            info!(recipient = %request.phone_number, "manual message sent");
            ApiResponse::reply(StatusCode::OK, "Message sent successfully")
        }
        Err(e) => {
            warn!(error = %e, "manual message failed");
            ApiResponse::reply(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics
///
/// Prometheus text exposition, or 404 when metrics are disabled.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_payload_deserializes_full_delivery() {
        let json = r#"{
            "chat_id": "6281100000001@s.whatsapp.net",
            "from": "6281100000001@s.whatsapp.net",
            "message": {"text": "/start", "id": "3EB0", "replied_id": "", "quoted_message": ""},
            "pushname": "dr. Budi",
            "sender_id": "6281100000001",
            "timestamp": "2026-01-15T08:00:00Z"
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.sender_id, "6281100000001");
        assert_eq!(payload.message.text, "/start");

        let inbound = InboundMessage::from(payload);
        assert_eq!(inbound, InboundMessage::new("6281100000001", "/start"));
    }

    #[test]
    fn webhook_payload_fields_default_to_empty() {
        let payload: WebhookPayload = serde_json::from_str(r#"{"sender_id": "628"}"#).unwrap();
        assert_eq!(payload.sender_id, "628");
        assert!(payload.message.text.is_empty());
        assert!(payload.pushname.is_empty());
    }

    #[test]
    fn api_response_serializes_null_data() {
        let resp = ApiResponse {
            code: 200,
            message: "OK".to_string(),
            data: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"code":200,"message":"OK","data":null}"#);
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }
}
