//! PendingCallback - main thread で実行を待つエントリ
//!
//! # 学習ポイント
//! - `Box<dyn FnOnce() + Send>` による type erasure
//! - 型付きの値はクロージャにキャプチャして渡す（downcast 不要）

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::CallbackId;

/// An owned action that runs once on the main thread.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Where a callback was enqueued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Main,
    Worker,
}

/// Binds a worker-produced value to its callback.
///
/// The result is an ordinary `Callback`: `T` stays concrete inside the
/// closure, so the value reaches `callback` with its type intact.
///
/// ```ignore
/// let cb = bind(42_u32, |v| assert_eq!(v, 42));
/// cb();
/// ```
pub fn bind<T, C>(value: T, callback: C) -> Callback
where
    T: Send + 'static,
    C: FnOnce(T) + Send + 'static,
{
    Box::new(move || callback(value))
}

/// A queued callback. Consumed exactly once by [`PendingCallback::invoke`].
pub struct PendingCallback {
    id: CallbackId,
    origin: Origin,
    callback: Callback,
}

impl PendingCallback {
    pub(crate) fn new(id: CallbackId, origin: Origin, callback: Callback) -> Self {
        Self {
            id,
            origin,
            callback,
        }
    }

    pub fn id(&self) -> CallbackId {
        self.id
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Run the callback, consuming the entry.
    pub fn invoke(self) {
        (self.callback)()
    }
}

impl fmt::Debug for PendingCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCallback")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn bind_passes_value_through() {
        let seen = Arc::new(AtomicU32::new(0));
        let cb = bind(42_u32, {
            let seen = Arc::clone(&seen);
            move |v| seen.store(v, Ordering::SeqCst)
        });
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        cb();
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn bind_keeps_owned_types() {
        let out = Arc::new(parking_lot::Mutex::new(None));
        let cb = bind(vec!["a".to_string(), "b".to_string()], {
            let out = Arc::clone(&out);
            move |v: Vec<String>| *out.lock() = Some(v)
        });
        cb();
        assert_eq!(
            out.lock().as_deref(),
            Some(&["a".to_string(), "b".to_string()][..])
        );
    }

    #[test]
    fn invoke_runs_once_and_debug_hides_closure() {
        let hits = Arc::new(AtomicU32::new(0));
        let entry = PendingCallback::new(
            CallbackId::new(3),
            Origin::Worker,
            Box::new({
                let hits = Arc::clone(&hits);
                move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                }
            }),
        );
        let dbg = format!("{entry:?}");
        assert!(dbg.contains("CallbackId(3)"));
        assert!(dbg.contains("Worker"));

        entry.invoke();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
