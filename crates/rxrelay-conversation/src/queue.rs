// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide daily queue numbering.
//!
//! Numbers form one global sequence shared by every doctor. The sequence
//! restarts at 1 on the first issuance after the local calendar date
//! changes. An issued number is never handed out again, even when the
//! dispatch it was issued for later fails.

use std::sync::Arc;

use chrono::NaiveDate;
use rxrelay_core::QueueAssignment;
use tokio::sync::Mutex;
use tracing::info;

use crate::clock::Clock;

#[derive(Debug)]
struct CounterState {
    current_date: NaiveDate,
    next_sequence: u32,
}

impl CounterState {
    /// Restart the sequence if the calendar day has advanced.
    fn maybe_reset_daily(&mut self, today: NaiveDate) {
        if today > self.current_date {
            info!(
                previous = %self.current_date,
                today = %today,
                "new day, resetting queue numbers"
            );
            self.current_date = today;
            self.next_sequence = 1;
        }
    }
}

/// Hands out [`QueueAssignment`]s under a single lock.
pub struct QueueCounter {
    state: Mutex<CounterState>,
    clock: Arc<dyn Clock>,
}

impl QueueCounter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        Self {
            state: Mutex::new(CounterState {
                current_date: today,
                next_sequence: 1,
            }),
            clock,
        }
    }

    /// Issues the next number. The date is read while the lock is held so a
    /// midnight rollover cannot interleave with another issuance.
    pub async fn issue_next(&self) -> QueueAssignment {
        let mut state = self.state.lock().await;
        state.maybe_reset_daily(self.clock.today());
        let assignment = QueueAssignment {
            date: state.current_date,
            sequence: state.next_sequence,
        };
        state.next_sequence = state.next_sequence.saturating_add(1);
        assignment
    }

    /// The number the next call to [`issue_next`](Self::issue_next) would
    /// return, without consuming it.
    pub async fn peek_next(&self) -> u32 {
        let state = self.state.lock().await;
        if self.clock.today() > state.current_date {
            1
        } else {
            state.next_sequence
        }
    }
}

impl std::fmt::Debug for QueueCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueCounter").finish_non_exhaustive()
    }
}
