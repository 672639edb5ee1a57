mod clock;
mod engine;
mod handle;
mod scheduler;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{format_clock, SessionSink, TimerEngine, TimerSnapshot};
pub use handle::FocusTimer;
pub use scheduler::{ManualScheduler, TickControl, TickFn, TickScheduler, TokioScheduler};
