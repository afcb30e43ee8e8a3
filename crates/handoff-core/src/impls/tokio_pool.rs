//! TokioPool - tokio の blocking pool を WorkerPool として使う

use tokio::runtime::Handle;

use super::run_job;
use crate::domain::DispatchError;
use crate::ports::{Job, WorkerPool};

/// Runs jobs with `Handle::spawn_blocking`.
///
/// Useful when the host already owns a tokio runtime. The JoinHandle is
/// dropped: results come back through the callback queue instead.
///
/// # 制約
/// `submit` cannot tell that the runtime behind the handle has shut down.
/// tokio then cancels the job without running it and `submit` still
/// returns `Ok(())`, so its callback never arrives. Keep the runtime alive
/// for as long as the dispatcher, or use `ThreadPool`, which reports
/// `PoolClosed`.
#[derive(Clone)]
pub struct TokioPool {
    handle: Handle,
}

impl TokioPool {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Pool on the runtime the caller is running in.
    pub fn current() -> Result<Self, DispatchError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| DispatchError::PoolSpawn(e.to_string()))
    }
}

impl WorkerPool for TokioPool {
    fn submit(&self, job: Job) -> Result<(), DispatchError> {
        drop(self.handle.spawn_blocking(move || run_job("tokio-pool", job)));
        Ok(())
    }

    fn name(&self) -> &str {
        "tokio-pool"
    }
}
