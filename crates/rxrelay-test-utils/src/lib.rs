// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for RxRelay integration tests.
//!
//! Provides mock adapters and a harness for fast, deterministic tests
//! without a chat gateway or ledger file.
//!
//! # Components
//!
//! - [`MockChatSender`] - Captures outbound messages, can fail per recipient
//! - [`MockLedger`] - Captures appended records, can be switched to fail
//! - [`TestHarness`] - A conversation engine wired to both mocks and a manual clock

pub mod harness;
pub mod mock_chat;
pub mod mock_ledger;

pub use harness::{DOCTOR, PHARMACY, TestHarness, TestHarnessBuilder};
pub use mock_chat::{MockChatSender, SendHold, SentMessage};
pub use mock_ledger::MockLedger;
