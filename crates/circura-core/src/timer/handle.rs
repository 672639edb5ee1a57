//! A running focus timer: the engine plus the tick source that drives it.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use super::engine::{TimerEngine, TimerSnapshot};
use super::scheduler::{TickControl, TickScheduler};
use crate::events::{ListenerId, TimerEvent};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns a [`TimerEngine`] and a [`TickScheduler`].
///
/// The engine sits behind a mutex shared with the tick callback, so ticks and
/// commands never interleave. A tick only lands if the engine is still in the
/// generation it was scheduled for: once `pause()` returns, no further tick
/// can change the countdown, however late the scheduler fires.
pub struct FocusTimer {
    engine: Arc<Mutex<TimerEngine>>,
    scheduler: Box<dyn TickScheduler>,
}

impl FocusTimer {
    pub fn new(engine: TimerEngine, scheduler: impl TickScheduler + 'static) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            scheduler: Box::new(scheduler),
        }
    }

    pub fn start(&mut self) {
        let generation = {
            let mut engine = self.lock();
            if !engine.start() {
                return;
            }
            engine.generation()
        };
        let weak = Arc::downgrade(&self.engine);
        self.scheduler
            .schedule(TICK_PERIOD, Box::new(move || tick_once(&weak, generation)));
    }

    pub fn pause(&mut self) {
        self.lock().pause();
        self.scheduler.cancel();
    }

    pub fn reset(&mut self) {
        self.lock().reset();
        self.scheduler.cancel();
    }

    pub fn update_length(&mut self, minutes: i64) {
        self.lock().update_length(minutes);
        self.scheduler.cancel();
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&TimerEvent) + Send + 'static,
    {
        self.lock().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.lock().unsubscribe(id)
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, TimerEngine> {
        lock_engine(&self.engine)
    }
}

impl Drop for FocusTimer {
    fn drop(&mut self) {
        self.scheduler.cancel();
    }
}

impl std::fmt::Debug for FocusTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusTimer")
            .field("engine", &*self.lock())
            .finish_non_exhaustive()
    }
}

fn tick_once(engine: &Weak<Mutex<TimerEngine>>, generation: u64) -> TickControl {
    let Some(engine) = engine.upgrade() else {
        return TickControl::Stop;
    };
    let mut engine = lock_engine(&engine);
    if !engine.is_running() || engine.generation() != generation {
        return TickControl::Stop;
    }
    engine.tick();
    if engine.is_running() {
        TickControl::Continue
    } else {
        TickControl::Stop
    }
}

// A listener that panicked mid-event leaves the countdown itself consistent.
fn lock_engine(engine: &Mutex<TimerEngine>) -> MutexGuard<'_, TimerEngine> {
    engine.lock().unwrap_or_else(|e| e.into_inner())
}
