//! DispatcherBuilder - Dispatcher の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - trait object (`Arc<dyn WorkerPool>`) による実装の差し替え

use std::sync::Arc;

use super::dispatcher::Dispatcher;
use crate::config::DispatcherConfig;
use crate::domain::DispatchError;
use crate::impls::ThreadPool;
use crate::ports::WorkerPool;

/// Builds a [`Dispatcher`] bound to the calling thread.
///
/// # 使用例
/// ```ignore
/// // main thread で呼ぶこと
/// let dispatcher = DispatcherBuilder::new()
///     .config(DispatcherConfig::load("handoff.toml")?)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - build() 時に config を検証する
/// - pool 未指定なら `worker_threads` 本の ThreadPool を起動する
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    pool: Option<Arc<dyn WorkerPool>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            pool: None,
        }
    }

    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `pool` instead of starting a `ThreadPool`.
    pub fn pool<P: WorkerPool + 'static>(self, pool: P) -> Self {
        self.shared_pool(Arc::new(pool))
    }

    /// Use a pool that is also shared with other parts of the host.
    pub fn shared_pool(mut self, pool: Arc<dyn WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Build the dispatcher. The calling thread becomes its main thread.
    pub fn build(self) -> Result<Dispatcher, DispatchError> {
        self.config.validate()?;
        let pool = match self.pool {
            Some(pool) => pool,
            None => Arc::new(ThreadPool::new(self.config.worker_threads)?),
        };
        Ok(Dispatcher::new(self.config, pool))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
