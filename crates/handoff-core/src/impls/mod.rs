//! Impls - WorkerPool の実装
//!
//! # 含まれる実装
//! - **ThreadPool**: 固定数の std スレッド（デフォルト）
//! - **TokioPool**: tokio ランタイムの blocking pool

pub mod thread_pool;
pub mod tokio_pool;

pub use self::thread_pool::ThreadPool;
pub use self::tokio_pool::TokioPool;

use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::domain::errors::panic_message;
use crate::ports::Job;

/// Run one job, logging a panic instead of unwinding into the pool thread.
pub(crate) fn run_job(pool: &str, job: Job) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
        error!(
            pool,
            panic = %panic_message(payload.as_ref()),
            "worker task panicked"
        );
    }
}
