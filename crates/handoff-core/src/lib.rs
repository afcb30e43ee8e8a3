//! handoff-core
//!
//! Run work on background threads and hand the results back to the main
//! thread at a well-defined point in its update loop.
//!
//! # モジュール構成
//! - **domain**: CallbackId, PendingCallback, DispatchError
//! - **ports**: WorkerPool trait（外部スレッドプールの抽象）
//! - **impls**: ThreadPool, TokioPool
//! - **queue**: CallbackQueue（ワーカーと main thread が共有する唯一の可変状態）
//! - **app**: DispatcherBuilder, Dispatcher, DispatchHandle, MainLoop, global
//! - **config**: DispatcherConfig（TOML）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod queue;

pub use app::{DispatchHandle, Dispatcher, DispatcherBuilder, DispatcherStats, DrainReport, MainLoop};
pub use config::DispatcherConfig;
pub use domain::{CallbackId, DispatchError};
