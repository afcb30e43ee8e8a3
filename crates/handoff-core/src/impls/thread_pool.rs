//! ThreadPool - 固定数の std スレッドで Job を実行
//!
//! # 学習ポイント
//! - crossbeam-channel の Receiver を複数スレッドで共有（MPMC）
//! - Sender を drop するとワーカーが自然に終了する
//! - catch_unwind でワーカースレッドを panic から守る

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;

use super::run_job;
use crate::domain::DispatchError;
use crate::ports::{Job, WorkerPool};

/// Fixed-size pool of named worker threads fed by an unbounded channel.
///
/// # 使用例
/// ```ignore
/// let pool = ThreadPool::new(4)?;
/// pool.submit(Box::new(|| println!("on a worker")))?;
/// pool.shutdown();
/// ```
pub struct ThreadPool {
    /// `None` after shutdown.
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl ThreadPool {
    /// Spawn `threads` workers named `handoff-worker-{n}`.
    pub fn new(threads: usize) -> Result<Self, DispatchError> {
        if threads == 0 {
            return Err(DispatchError::Config(
                "thread pool needs at least one worker".to_string(),
            ));
        }

        let (tx, rx) = crossbeam_channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(threads);
        for worker_id in 0..threads {
            let rx = rx.clone();
            let join = thread::Builder::new()
                .name(format!("handoff-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, rx))
                .map_err(|e| DispatchError::PoolSpawn(e.to_string()))?;
            workers.push(join);
        }
        debug!(threads, "thread pool started");

        Ok(Self {
            sender: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
            size: threads,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Stop accepting jobs, let workers finish what is queued, and join them.
    ///
    /// Idempotent. When called from one of the pool's own threads that
    /// thread is not joined (it would wait on itself).
    pub fn shutdown(&self) {
        // sender を drop → channel が閉じる → worker_loop が抜ける
        drop(self.sender.lock().take());

        let workers = std::mem::take(&mut *self.workers.lock());
        let current = thread::current().id();
        for join in workers {
            if join.thread().id() == current {
                continue;
            }
            // job の panic は worker_loop 内で捕捉済み
            let _ = join.join();
        }
    }
}

impl WorkerPool for ThreadPool {
    fn submit(&self, job: Job) -> Result<(), DispatchError> {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(tx) => tx.send(job).map_err(|_| DispatchError::PoolClosed),
            None => Err(DispatchError::PoolClosed),
        }
    }

    fn name(&self) -> &str {
        "thread-pool"
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(worker_id: usize, rx: Receiver<Job>) {
    for job in rx.iter() {
        run_job("thread-pool", job);
    }
    debug!(worker_id, "worker exiting");
}
