//! Ports - 抽象化レイヤー
//!
//! The dispatcher consumes two host services: a thread pool and a
//! per-tick update notification. The pool is a trait here; the tick is
//! simply the host calling `Dispatcher::drain` (see `app::main_loop` for a
//! standalone driver).

pub mod worker_pool;

pub use self::worker_pool::{Job, WorkerPool};
