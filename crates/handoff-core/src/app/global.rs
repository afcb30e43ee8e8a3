//! Global - プロセス全体で共有する Dispatcher
//!
//! For hosts that want one dispatcher reachable from anywhere. Creation is
//! an explicit step: `init` must run on the main thread before any other
//! function here is useful. Nothing is created lazily from a worker.
//!
//! ```ignore
//! // startup, on the main thread
//! handoff_core::app::global::init(DispatcherConfig::default())?;
//!
//! // anywhere
//! global::dispatch_async_with(load_level, |level| install(level))?;
//!
//! // every frame, on the main thread
//! global::drain()?;
//! ```

use std::sync::OnceLock;
use std::thread;

use tracing::{debug, error, warn};

use super::builder::DispatcherBuilder;
use super::dispatcher::{DispatchHandle, Dispatcher};
use super::status::{DispatcherStats, DrainReport};
use crate::config::DispatcherConfig;
use crate::domain::{CallbackId, DispatchError};

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

/// Create the process-wide dispatcher with a default `ThreadPool`.
///
/// The calling thread becomes the main thread. Calling again returns the
/// existing handle and changes nothing.
pub fn init(config: DispatcherConfig) -> Result<DispatchHandle, DispatchError> {
    init_with(DispatcherBuilder::new().config(config))
}

/// Like [`init`], with a fully configured builder (custom pool, ...).
pub fn init_with(builder: DispatcherBuilder) -> Result<DispatchHandle, DispatchError> {
    if let Some(existing) = GLOBAL.get() {
        if existing.is_main_thread() {
            debug!("global dispatcher already initialized");
        } else {
            warn!("global::init called off the main thread after initialization");
        }
        return Ok(existing.handle());
    }

    let dispatcher = builder.build()?;
    let installed = GLOBAL.get_or_init(|| dispatcher);
    if installed.main_thread() != thread::current().id() {
        // 別スレッドとの init 競合に負けた: 先に入った方が main thread
        warn!("concurrent global::init; keeping the first dispatcher");
    }
    Ok(installed.handle())
}

pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Handle to the global dispatcher, if initialized.
pub fn handle() -> Option<DispatchHandle> {
    GLOBAL.get().map(Dispatcher::handle)
}

pub fn dispatch_async<F>(task: F) -> Result<(), DispatchError>
where
    F: FnOnce() + Send + 'static,
{
    dispatcher("dispatch_async")?.handle().dispatch_async(task)
}

pub fn dispatch_async_then<F, C>(task: F, callback: C) -> Result<(), DispatchError>
where
    F: FnOnce() + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    dispatcher("dispatch_async_then")?
        .handle()
        .dispatch_async_then(task, callback)
}

pub fn dispatch_async_with<T, F, C>(task: F, callback: C) -> Result<(), DispatchError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
    C: FnOnce(T) + Send + 'static,
{
    dispatcher("dispatch_async_with")?
        .handle()
        .dispatch_async_with(task, callback)
}

/// Queue `action` for the next global drain.
///
/// Before `init` the action is dropped and an error is logged.
pub fn dispatch_on_main<C>(action: C) -> Result<CallbackId, DispatchError>
where
    C: FnOnce() + Send + 'static,
{
    Ok(dispatcher("dispatch_on_main")?.handle().dispatch_on_main(action))
}

/// Drain the global dispatcher. Main thread only.
pub fn drain() -> Result<DrainReport, DispatchError> {
    dispatcher("drain")?.drain()
}

pub fn stats() -> Option<DispatcherStats> {
    GLOBAL.get().map(Dispatcher::stats)
}

fn dispatcher(op: &'static str) -> Result<&'static Dispatcher, DispatchError> {
    GLOBAL.get().ok_or_else(|| {
        error!(op, "global dispatcher used before init; call global::init on the main thread");
        DispatchError::NotInitialized
    })
}
