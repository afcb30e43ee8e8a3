//! MainLoop - 固定間隔の tick で drain を呼ぶ
//!
//! Engines already have a frame loop and should call `Dispatcher::drain`
//! from it directly. `MainLoop` is the standalone stand-in for that loop:
//! drain, sleep out the rest of the tick, repeat.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::dispatcher::Dispatcher;
use super::status::DispatcherStats;
use crate::domain::DispatchError;

pub struct MainLoop {
    tick_interval: Duration,
    max_ticks: Option<u64>,
}

impl MainLoop {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            max_ticks: None,
        }
    }

    /// Tick length from the dispatcher's config.
    pub fn for_dispatcher(dispatcher: &Dispatcher) -> Self {
        Self::new(dispatcher.config().tick_interval())
    }

    /// Give up after `ticks` ticks in `run_until`.
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Run exactly `ticks` ticks.
    pub fn run_ticks(
        &self,
        dispatcher: &Dispatcher,
        ticks: u64,
    ) -> Result<DispatcherStats, DispatchError> {
        for _ in 0..ticks {
            self.tick(dispatcher)?;
        }
        Ok(dispatcher.stats())
    }

    /// Tick until `done` returns true (checked after each drain).
    ///
    /// Returns the number of ticks run, or `DispatchError::TickLimit` when
    /// `max_ticks` is reached first.
    pub fn run_until<P>(&self, dispatcher: &Dispatcher, mut done: P) -> Result<u64, DispatchError>
    where
        P: FnMut() -> bool,
    {
        let mut ticks = 0;
        loop {
            if let Some(max) = self.max_ticks
                && ticks >= max
            {
                warn!(ticks, pending = dispatcher.pending(), "main loop hit its tick limit");
                return Err(DispatchError::TickLimit(ticks));
            }
            self.tick(dispatcher)?;
            ticks += 1;
            if done() {
                debug!(ticks, "main loop finished");
                return Ok(ticks);
            }
        }
    }

    fn tick(&self, dispatcher: &Dispatcher) -> Result<(), DispatchError> {
        let started = Instant::now();
        dispatcher.drain()?;
        // 残り時間だけ sleep（drain が長引いたら即次の tick）
        if let Some(rest) = self.tick_interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DispatcherBuilder;
    use crate::config::DispatcherConfig;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dispatcher() -> Dispatcher {
        DispatcherBuilder::new()
            .config(DispatcherConfig {
                worker_threads: 2,
                tick_interval_ms: 1,
                ..DispatcherConfig::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn run_ticks_counts_ticks() {
        let d = dispatcher();
        d.handle().dispatch_on_main(|| {});
        let stats = MainLoop::for_dispatcher(&d).run_ticks(&d, 3).unwrap();
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.drained, 1);
    }

    #[test]
    fn run_until_stops_when_callbacks_arrive() {
        let d = dispatcher();
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let done = Arc::clone(&done);
            d.handle()
                .dispatch_async_then(
                    || std::thread::sleep(Duration::from_millis(2)),
                    move || {
                        done.fetch_add(1, Ordering::SeqCst);
                    },
                )
                .unwrap();
        }

        let ticks = MainLoop::for_dispatcher(&d)
            .with_max_ticks(5_000)
            .run_until(&d, || done.load(Ordering::SeqCst) == 10)
            .unwrap();
        assert!(ticks >= 1);
        assert_eq!(done.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn run_until_reports_tick_limit() {
        let d = dispatcher();
        let err = MainLoop::new(Duration::ZERO)
            .with_max_ticks(3)
            .run_until(&d, || false)
            .unwrap_err();
        assert!(matches!(err, DispatchError::TickLimit(3)));
        assert_eq!(d.stats().ticks, 3);
    }

    #[test]
    fn tick_sleeps_out_the_interval() {
        let d = dispatcher();
        let started = Instant::now();
        MainLoop::new(Duration::from_millis(20))
            .run_ticks(&d, 2)
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
