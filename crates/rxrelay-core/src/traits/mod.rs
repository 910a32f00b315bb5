// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port trait definitions for RxRelay's outbound adapters.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod chat;
pub mod ledger;

pub use adapter::PluginAdapter;
pub use chat::ChatSender;
pub use ledger::Ledger;
