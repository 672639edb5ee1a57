//! Repeating tick sources.
//!
//! A [`TickScheduler`] calls a closure once per period until it is cancelled
//! or the closure asks to stop. [`TokioScheduler`] is the real one;
//! [`ManualScheduler`] only fires when a test advances it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Returned by a tick callback to keep or drop its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

pub type TickFn = Box<dyn FnMut() -> TickControl + Send>;

pub trait TickScheduler: Send {
    /// Replace any active schedule with `tick`, first firing one `period` from now.
    fn schedule(&mut self, period: Duration, tick: TickFn);

    /// Drop the active schedule, if any. Idempotent.
    fn cancel(&mut self);
}

/// Fires ticks from a tokio task driven by `tokio::time::interval`.
#[derive(Debug)]
pub struct TokioScheduler {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    /// Bind to the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
        }
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(&mut self, period: Duration, mut tick: TickFn) {
        self.cancel();
        self.task = Some(self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tick() == TickControl::Stop {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A hand-cranked scheduler. Clones share the same slot, so a test can keep
/// one clone while the timer owns another.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    slot: Arc<Mutex<Option<TickFn>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.lock().is_some()
    }

    /// Fire up to `ticks` ticks. Returns how many actually fired.
    pub fn advance(&self, ticks: u64) -> u64 {
        let mut fired = 0;
        for _ in 0..ticks {
            // Take the callback out so it runs without the slot locked.
            let Some(mut tick) = self.lock().take() else {
                break;
            };
            fired += 1;
            if tick() == TickControl::Continue {
                let mut slot = self.lock();
                if slot.is_none() {
                    *slot = Some(tick);
                }
            }
        }
        fired
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TickFn>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, _period: Duration, tick: TickFn) {
        *self.lock() = Some(tick);
    }

    fn cancel(&mut self) {
        self.lock().take();
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("armed", &self.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn counting(limit: u64) -> (Arc<AtomicU64>, TickFn) {
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        let tick: TickFn = Box::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= limit {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        });
        (count, tick)
    }

    #[test]
    fn manual_scheduler_fires_until_stop() {
        let mut scheduler = ManualScheduler::new();
        let (count, tick) = counting(3);
        scheduler.schedule(Duration::from_secs(1), tick);

        assert_eq!(scheduler.advance(10), 3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn manual_scheduler_cancel_disarms() {
        let mut scheduler = ManualScheduler::new();
        let (count, tick) = counting(u64::MAX);
        scheduler.schedule(Duration::from_secs(1), tick);
        scheduler.advance(2);
        scheduler.cancel();

        assert_eq!(scheduler.advance(5), 0);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_fires_once_per_period() {
        let mut scheduler = TokioScheduler::new();
        let (count, tick) = counting(u64::MAX);
        scheduler.schedule(Duration::from_secs(1), tick);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        scheduler.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
