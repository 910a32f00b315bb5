// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for RxRelay.
//!
//! Receives chat-gateway webhook deliveries and hands each one to the
//! conversation engine on its own task. Also serves a token-protected manual
//! send route, `GET /health` and `GET /metrics`.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
