//! Errors - ディスパッチャのエラー型

use std::any::Any;
use std::thread::ThreadId;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The process-wide dispatcher was used before `global::init` ran on the main thread.
    #[error("dispatcher is not initialized; call global::init from the main thread first")]
    NotInitialized,

    #[error("operation must run on the main thread (main={main:?}, current={current:?})")]
    NotMainThread { main: ThreadId, current: ThreadId },

    #[error("worker pool is closed")]
    PoolClosed,

    #[error("failed to start worker pool: {0}")]
    PoolSpawn(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("main loop stopped after {0} ticks before its condition was met")]
    TickLimit(u64),
}

/// Best-effort text of a panic payload, for logging.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boom() {
        panic!("boom")
    }

    fn boom_owned() {
        panic!("{} {}", "owned", 1)
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let static_payload = std::panic::catch_unwind(boom).unwrap_err();
        assert_eq!(panic_message(static_payload.as_ref()), "boom");

        let owned_payload = std::panic::catch_unwind(boom_owned).unwrap_err();
        assert_eq!(panic_message(owned_payload.as_ref()), "owned 1");

        let other: Box<dyn Any + Send> = Box::new(5_u8);
        assert_eq!(panic_message(other.as_ref()), "<non-string panic payload>");
    }

    #[test]
    fn not_initialized_mentions_init() {
        let msg = DispatchError::NotInitialized.to_string();
        assert!(msg.contains("init"));
    }
}
