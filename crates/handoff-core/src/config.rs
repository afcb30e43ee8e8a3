//! Dispatcher configuration, loaded from TOML.
//!
//! ```toml
//! worker_threads = 4
//! max_callbacks_per_tick = 256
//! tick_interval_ms = 16
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DispatchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Threads in the default `ThreadPool`. Ignored when a pool is supplied.
    pub worker_threads: usize,

    /// Upper bound on callbacks invoked by one drain. `None` drains
    /// everything that was queued when the drain started.
    pub max_callbacks_per_tick: Option<usize>,

    /// Tick length used by `MainLoop`.
    pub tick_interval_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            worker_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            max_callbacks_per_tick: None,
            tick_interval_ms: 16,
        }
    }
}

impl DispatcherConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, DispatchError> {
        let config: Self = toml::from_str(s).map_err(|e| DispatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DispatchError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.worker_threads == 0 {
            return Err(DispatchError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_callbacks_per_tick == Some(0) {
            return Err(DispatchError::Config(
                "max_callbacks_per_tick must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_document_uses_defaults() {
        let config = DispatcherConfig::from_toml_str("").unwrap();
        assert_eq!(config, DispatcherConfig::default());
        assert!(config.worker_threads >= 1);
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn reads_all_keys() {
        let config = DispatcherConfig::from_toml_str(
            "worker_threads = 3\nmax_callbacks_per_tick = 64\ntick_interval_ms = 5\n",
        )
        .unwrap();
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.max_callbacks_per_tick, Some(64));
        assert_eq!(config.tick_interval_ms, 5);
    }

    #[rstest]
    #[case::zero_workers("worker_threads = 0")]
    #[case::zero_budget("max_callbacks_per_tick = 0")]
    #[case::unknown_key("queue_size = 10")]
    #[case::wrong_type("worker_threads = \"many\"")]
    fn rejects_invalid_documents(#[case] doc: &str) {
        let err = DispatcherConfig::from_toml_str(doc).unwrap_err();
        assert!(matches!(err, DispatchError::Config(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = DispatcherConfig::load("/definitely/not/here/handoff.toml").unwrap_err();
        assert!(err.to_string().contains("handoff.toml"));
    }
}
