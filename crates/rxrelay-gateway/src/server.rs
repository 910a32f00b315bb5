// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use rxrelay_conversation::ConversationEngine;
use rxrelay_core::{ChatSender, RxRelayError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Health state for the unauthenticated health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl HealthState {
    pub fn new(prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            prometheus_render,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<ConversationEngine>,
    /// Sender used by the manual send route.
    pub sender: Arc<dyn ChatSender>,
    pub auth: AuthConfig,
    pub health: HealthState,
    /// Tracks in-flight webhook tasks so shutdown can drain them.
    pub tasks: TaskTracker,
}

/// Gateway server configuration (mirrors `GatewayConfig` from rxrelay-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route the chat gateway posts deliveries to.
    pub webhook_path: String,
}

/// Builds the router:
/// - POST {webhook_path}
/// - POST /v1/messages/send (bearer auth)
/// - GET /health
/// - GET /metrics
pub fn build_router(config: &ServerConfig, state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route(&config.webhook_path, post(handlers::post_webhook))
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/messages/send", post(handlers::post_send))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
}

/// Serves the gateway until `cancel` fires, then waits for in-flight webhook
/// tasks to finish.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), RxRelayError> {
    let tasks = state.tasks.clone();
    let app = build_router(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RxRelayError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!(webhook_path = %config.webhook_path, "gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| RxRelayError::Internal(format!("gateway server error: {e}")))?;

    tasks.close();
    tracing::info!(pending = tasks.len(), "draining in-flight messages");
    tasks.wait().await;
    Ok(())
}
