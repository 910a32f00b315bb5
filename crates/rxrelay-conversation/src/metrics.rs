// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; without an installed recorder every call is a
//! no-op.

use metrics::{describe_counter, describe_gauge, describe_histogram};

/// Register all RxRelay metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "rxrelay_messages_total",
        "Inbound messages by handling outcome"
    );
    describe_counter!(
        "rxrelay_prescriptions_dispatched_total",
        "Prescriptions delivered to the pharmacy"
    );
    describe_counter!(
        "rxrelay_dispatch_failures_total",
        "Confirm-and-dispatch failures by stage"
    );
    describe_gauge!("rxrelay_queue_number", "Last queue number issued today");
    describe_gauge!("rxrelay_known_senders", "Senders with conversation state");
    describe_histogram!(
        "rxrelay_dispatch_latency_seconds",
        "Time from confirmation to pharmacy delivery"
    );
}

/// Record a handled inbound message.
pub fn record_message(outcome: &'static str) {
    metrics::counter!("rxrelay_messages_total", "outcome" => outcome).increment(1);
}

pub fn record_dispatched() {
    metrics::counter!("rxrelay_prescriptions_dispatched_total").increment(1);
}

/// Record a failed dispatch stage (`parse`, `ledger`, `pharmacy`, `patient`).
pub fn record_dispatch_failure(stage: &'static str) {
    metrics::counter!("rxrelay_dispatch_failures_total", "stage" => stage).increment(1);
}

pub fn set_queue_number(sequence: u32) {
    metrics::gauge!("rxrelay_queue_number").set(f64::from(sequence));
}

pub fn set_known_senders(count: usize) {
    metrics::gauge!("rxrelay_known_senders").set(count as f64);
}

pub fn record_dispatch_latency(seconds: f64) {
    metrics::histogram!("rxrelay_dispatch_latency_seconds").record(seconds);
}
