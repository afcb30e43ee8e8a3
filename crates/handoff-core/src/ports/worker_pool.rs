//! WorkerPool port - バックグラウンド実行の抽象化
//!
//! The dispatcher only needs fire-and-forget submission. Results travel
//! back through the callback queue, never through the pool.

use crate::domain::DispatchError;

/// A unit of work submitted to a pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A thread pool that runs jobs off the main thread.
///
/// # 実装
/// - `impls::ThreadPool`: fixed std threads
/// - `impls::TokioPool`: tokio blocking pool
///
/// Implementations decide what happens when a job panics; the dispatcher
/// does not catch task panics.
pub trait WorkerPool: Send + Sync {
    /// Hand `job` to a background thread. Must not block on the job itself.
    fn submit(&self, job: Job) -> Result<(), DispatchError>;

    /// Name used in log fields.
    fn name(&self) -> &str {
        "worker-pool"
    }
}
