//! Dispatcher - main thread 専用の drain と、どのスレッドからも使える handle
//!
//! # 役割分担
//! - **Dispatcher**: main thread で構築・保持する。`drain()` を tick ごとに呼ぶ
//! - **DispatchHandle**: clone してワーカーに渡す。`dispatch_*` はすぐ返る
//!
//! ```ignore
//! let dispatcher = DispatcherBuilder::new().build()?;
//! let handle = dispatcher.handle();
//! handle.dispatch_async_with(|| expensive(), |value| apply(value))?;
//!
//! loop {
//!     // once per frame
//!     dispatcher.drain()?;
//! }
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, error, trace};

use super::status::{DispatcherStats, DrainReport};
use crate::config::DispatcherConfig;
use crate::domain::errors::panic_message;
use crate::domain::{CallbackId, DispatchError, Origin, bind};
use crate::ports::WorkerPool;
use crate::queue::CallbackQueue;

/// State reachable from workers.
struct Shared {
    queue: CallbackQueue,
    pool: Arc<dyn WorkerPool>,
    main_thread: ThreadId,
}

impl Shared {
    fn origin(&self) -> Origin {
        if thread::current().id() == self.main_thread {
            Origin::Main
        } else {
            Origin::Worker
        }
    }
}

#[derive(Default)]
struct DrainTotals {
    drained: u64,
    panicked: u64,
    ticks: u64,
    last_drain_at: Option<chrono::DateTime<Utc>>,
}

/// Owner of the callback queue, bound to the thread that built it.
///
/// Dropping the dispatcher drops callbacks that were never drained, and
/// completions of tasks still running are discarded when they arrive.
/// Handles outlive it safely but their callbacks never run.
pub struct Dispatcher {
    shared: Arc<Shared>,
    config: DispatcherConfig,
    totals: Mutex<DrainTotals>,
}

impl Dispatcher {
    pub(crate) fn new(config: DispatcherConfig, pool: Arc<dyn WorkerPool>) -> Self {
        let main_thread = thread::current().id();
        debug!(pool = pool.name(), ?main_thread, "dispatcher created");
        Self {
            shared: Arc::new(Shared {
                queue: CallbackQueue::new(),
                pool,
                main_thread,
            }),
            config,
            totals: Mutex::new(DrainTotals::default()),
        }
    }

    /// A cloneable handle for dispatching from any thread.
    pub fn handle(&self) -> DispatchHandle {
        DispatchHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn main_thread(&self) -> ThreadId {
        self.shared.main_thread
    }

    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.shared.main_thread
    }

    /// Callbacks waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Run queued callbacks in enqueue order. Call once per tick.
    ///
    /// Only the entries present when the drain starts are considered (capped
    /// by `max_callbacks_per_tick`); anything enqueued meanwhile, including
    /// by the callbacks themselves, waits for the next call. A panicking
    /// callback is logged and counted and the remaining entries still run.
    pub fn drain(&self) -> Result<DrainReport, DispatchError> {
        let current = thread::current().id();
        if current != self.shared.main_thread {
            return Err(DispatchError::NotMainThread {
                main: self.shared.main_thread,
                current,
            });
        }

        let queued = self.shared.queue.len();
        let budget = match self.config.max_callbacks_per_tick {
            Some(max) => queued.min(max),
            None => queued,
        };

        let mut report = DrainReport::default();
        for _ in 0..budget {
            let Some(entry) = self.shared.queue.pop() else {
                break;
            };
            let id = entry.id();
            let origin = entry.origin();
            // entry は pop 済み: panic してもキューは壊れない
            match panic::catch_unwind(AssertUnwindSafe(move || entry.invoke())) {
                Ok(()) => report.invoked += 1,
                Err(payload) => {
                    error!(
                        %id,
                        ?origin,
                        panic = %panic_message(payload.as_ref()),
                        "callback panicked during drain"
                    );
                    report.panicked.push(id);
                }
            }
        }
        report.remaining = self.shared.queue.len();

        let mut totals = self.totals.lock();
        totals.ticks += 1;
        totals.drained += report.invoked as u64;
        totals.panicked += report.panicked.len() as u64;
        if report.consumed() > 0 {
            totals.last_drain_at = Some(Utc::now());
            debug!(
                invoked = report.invoked,
                panicked = report.panicked.len(),
                remaining = report.remaining,
                "drained callbacks"
            );
        }
        Ok(report)
    }

    pub fn stats(&self) -> DispatcherStats {
        let totals = self.totals.lock();
        DispatcherStats {
            pool: self.shared.pool.name().to_string(),
            enqueued: self.shared.queue.enqueued_total(),
            drained: totals.drained,
            panicked: totals.panicked,
            pending: self.shared.queue.len(),
            ticks: totals.ticks,
            last_drain_at: totals.last_drain_at,
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // 未 drain の callback が handle (= Arc<Shared>) を握っていると循環参照になる
        let discarded = self.shared.queue.close();
        if discarded > 0 {
            debug!(discarded, "dispatcher dropped with undrained callbacks");
        }
    }
}

/// Dispatch entry points, usable from any thread.
#[derive(Clone)]
pub struct DispatchHandle {
    shared: Arc<Shared>,
}

impl DispatchHandle {
    /// Run `task` on the pool; nothing comes back to the main thread.
    pub fn dispatch_async<F>(&self, task: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Box::new(task))
    }

    /// Run `task` on the pool, then queue `callback` for the main thread.
    pub fn dispatch_async_then<F, C>(&self, task: F, callback: C) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        self.submit(Box::new(move || {
            task();
            let id = shared.queue.push(Origin::Worker, Box::new(callback));
            trace!(%id, "completion queued");
        }))
    }

    /// Run `task` on the pool and hand its value to `callback` on the main thread.
    pub fn dispatch_async_with<T, F, C>(&self, task: F, callback: C) -> Result<(), DispatchError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        self.submit(Box::new(move || {
            let value = task();
            let id = shared.queue.push(Origin::Worker, bind(value, callback));
            trace!(%id, "completion queued");
        }))
    }

    /// Queue `action` for the next drain. Never runs it synchronously.
    pub fn dispatch_on_main<C>(&self, action: C) -> CallbackId
    where
        C: FnOnce() + Send + 'static,
    {
        let id = self.shared.queue.push(self.shared.origin(), Box::new(action));
        trace!(%id, "action queued for main thread");
        id
    }

    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.shared.main_thread
    }

    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    fn submit(&self, job: crate::ports::Job) -> Result<(), DispatchError> {
        self.shared.pool.submit(job).inspect_err(|e| {
            error!(pool = self.shared.pool.name(), error = %e, "failed to submit task");
        })
    }
}
