//! Status - drain の結果と累積カウンタ

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::CallbackId;

/// Outcome of a single `Dispatcher::drain` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Callbacks that returned normally.
    pub invoked: usize,
    /// Callbacks that panicked (already removed from the queue).
    pub panicked: Vec<CallbackId>,
    /// Entries still queued when the drain returned.
    pub remaining: usize,
}

impl DrainReport {
    /// Entries consumed by this drain, successful or not.
    pub fn consumed(&self) -> usize {
        self.invoked + self.panicked.len()
    }
}

/// Cumulative dispatcher counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatcherStats {
    pub pool: String,
    pub enqueued: u64,
    pub drained: u64,
    pub panicked: u64,
    pub pending: usize,
    pub ticks: u64,
    pub last_drain_at: Option<DateTime<Utc>>,
}
