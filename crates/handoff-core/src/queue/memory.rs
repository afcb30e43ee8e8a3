//! In-memory callback queue.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::trace;

use crate::domain::{Callback, CallbackId, Origin, PendingCallback};

/// Queue state guarded by a single lock.
struct QueueState {
    /// Pending entries, oldest first.
    entries: VecDeque<PendingCallback>,

    /// Next CallbackId to assign.
    next_id: u64,

    /// Set once the owning dispatcher is gone; pushes are discarded.
    closed: bool,
}

impl QueueState {
    fn allocate_id(&mut self) -> CallbackId {
        let id = CallbackId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// FIFO of callbacks waiting for the main thread.
///
/// Design intent:
/// - This is the only shared mutable state between workers and the main thread.
/// - Every push and pop takes the same lock, so worker-vs-worker and
///   worker-vs-drain races are serialized.
/// - The lock is held only to move an entry in or out; callbacks never run
///   under it, so a callback may enqueue more work without deadlocking.
/// - After `close()` nothing is kept: callbacks may hold handles that point
///   back at this queue, and keeping them would form a reference cycle.
pub struct CallbackQueue {
    state: Mutex<QueueState>,
}

impl CallbackQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                entries: VecDeque::new(),
                next_id: 1,
                closed: false,
            }),
        }
    }

    /// Append a callback and return the id it was assigned.
    ///
    /// On a closed queue the callback is dropped without running.
    pub fn push(&self, origin: Origin, callback: Callback) -> CallbackId {
        let mut state = self.state.lock();
        let id = state.allocate_id();
        if state.closed {
            drop(state);
            // drop はロック外で（callback が handle を持っている場合がある）
            drop(callback);
            trace!(%id, "queue closed; callback discarded");
            return id;
        }
        state
            .entries
            .push_back(PendingCallback::new(id, origin, callback));
        id
    }

    /// Remove the oldest entry, if any.
    pub fn pop(&self) -> Option<PendingCallback> {
        self.state.lock().entries.pop_front()
    }

    /// Stop accepting callbacks and drop everything still queued.
    ///
    /// Returns the number of entries discarded. Idempotent.
    pub fn close(&self) -> usize {
        let discarded = {
            let mut state = self.state.lock();
            state.closed = true;
            std::mem::take(&mut state.entries)
        };
        discarded.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Total number of entries ever pushed.
    pub fn enqueued_total(&self) -> u64 {
        self.state.lock().next_id - 1
    }
}

impl Default for CallbackQueue {
    fn default() -> Self {
        Self::new()
    }
}
