//! Process-wide dispatcher lifecycle.
//!
//! Kept as a single test: the global dispatcher lives for the whole test
//! binary and is bound to the thread that initializes it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use handoff_core::app::global;
use handoff_core::{DispatchError, DispatcherConfig};

fn drain_until(expected: usize) -> usize {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut consumed = 0;
    while consumed < expected && Instant::now() < deadline {
        consumed += global::drain().unwrap().consumed();
        std::thread::sleep(Duration::from_millis(1));
    }
    consumed
}

#[test]
fn global_dispatcher_lifecycle() {
    let hits = Arc::new(AtomicUsize::new(0));

    // init 前: 何も queue されず、エラーになる
    assert!(!global::is_initialized());
    assert!(global::handle().is_none());
    let early = Arc::clone(&hits);
    let err = global::dispatch_on_main(move || {
        early.fetch_add(100, Ordering::SeqCst);
    })
    .unwrap_err();
    assert!(matches!(err, DispatchError::NotInitialized));
    assert!(matches!(
        global::dispatch_async(|| {}),
        Err(DispatchError::NotInitialized)
    ));
    assert!(matches!(global::drain(), Err(DispatchError::NotInitialized)));

    // init は冪等
    let config = DispatcherConfig {
        worker_threads: 2,
        ..DispatcherConfig::default()
    };
    let handle = global::init(config.clone()).unwrap();
    assert!(global::is_initialized());
    assert!(handle.is_main_thread());
    global::init(config).unwrap();

    // init が別スレッドから呼ばれても main thread は変わらない
    std::thread::spawn(|| {
        let h = global::init(DispatcherConfig::default()).unwrap();
        assert!(!h.is_main_thread());
        assert!(matches!(
            global::drain(),
            Err(DispatchError::NotMainThread { .. })
        ));
    })
    .join()
    .unwrap();

    // dispatch_on_main は同期実行されない
    let posted = Arc::clone(&hits);
    global::dispatch_on_main(move || {
        posted.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(global::drain().unwrap().invoked, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // typed task の値がそのまま届く
    let recorded = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&recorded);
    global::dispatch_async_with(|| 42_usize, move |v| sink.store(v, Ordering::SeqCst)).unwrap();
    let done = Arc::clone(&hits);
    global::dispatch_async_then(
        || {},
        move || {
            done.fetch_add(1, Ordering::SeqCst);
        },
    )
    .unwrap();
    assert_eq!(drain_until(2), 2);
    assert_eq!(recorded.load(Ordering::SeqCst), 42);

    // init 前に投げた action は一度も実行されていない
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    let stats = global::stats().unwrap();
    assert_eq!(stats.enqueued, 3);
    assert_eq!(stats.drained, 3);
    assert_eq!(stats.pending, 0);
}
