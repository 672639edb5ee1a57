//! Countdown engine.
//!
//! The engine is a pure in-memory state machine. It owns no thread and no
//! timer: something else (see [`super::FocusTimer`]) calls `tick()` once per
//! elapsed second while the engine is running.
//!
//! ## State Transitions
//!
//! ```text
//! Paused --start()--> Running
//! Running --pause() | completion--> Paused
//! reset() / update_length() --> Paused
//! ```
//!
//! Completion re-arms the countdown to its full length, so the engine is ready
//! for the next session without a reset.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(25);
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Session) when the countdown completes
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::events::{EventBus, ListenerId, TimerEvent};
use crate::session::Session;

/// Receives each completed session. Implemented by the session store.
pub trait SessionSink: Send {
    fn record(&self, session: &Session) -> Result<()>;
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub is_running: bool,
    pub total_seconds: u64,
    pub seconds_remaining: u64,
    pub progress: f64,
    pub formatted: String,
}

/// Core countdown state machine.
pub struct TimerEngine {
    total_seconds: u64,
    seconds_remaining: u64,
    is_running: bool,
    /// Bumped on every start and pause. Tick callbacks scheduled for an older
    /// generation are stale and must not touch the countdown.
    generation: u64,
    events: EventBus,
    sink: Option<Box<dyn SessionSink>>,
    clock: Arc<dyn Clock>,
}

impl TimerEngine {
    /// Create a paused engine for a countdown of `length_minutes`.
    pub fn new(length_minutes: i64) -> Self {
        let mut engine = Self {
            total_seconds: 0,
            seconds_remaining: 0,
            is_running: false,
            generation: 0,
            events: EventBus::new(),
            sink: None,
            clock: Arc::new(SystemClock),
        };
        engine.initialize(length_minutes);
        engine
    }

    /// Hand completed sessions to `sink`.
    pub fn with_sink(mut self, sink: impl SessionSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 0.0 .. 1.0 elapsed fraction of the countdown.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (self.total_seconds - self.seconds_remaining) as f64 / self.total_seconds as f64
    }

    pub fn formatted_remaining(&self) -> String {
        format_clock(self.seconds_remaining)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            is_running: self.is_running,
            total_seconds: self.total_seconds,
            seconds_remaining: self.seconds_remaining,
            progress: self.progress(),
            formatted: self.formatted_remaining(),
        }
    }

    // ── Listeners ────────────────────────────────────────────────────

    /// Attach a listener. Listeners run synchronously inside engine calls and
    /// must not call back into the engine.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TimerEvent) + Send + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set a fresh, paused countdown. Lengths of zero or less clamp to one second.
    pub fn initialize(&mut self, length_minutes: i64) {
        self.total_seconds = length_minutes.saturating_mul(60).max(1) as u64;
        self.seconds_remaining = self.total_seconds;
        self.is_running = false;
    }

    /// Returns false when the engine was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(
            remaining = self.seconds_remaining,
            generation = self.generation,
            "timer started"
        );
        self.events.emit(TimerEvent::StateChanged { running: true });
        true
    }

    /// Safe to call when not running.
    pub fn pause(&mut self) {
        if self.is_running {
            tracing::debug!(remaining = self.seconds_remaining, "timer paused");
        }
        self.is_running = false;
        self.generation = self.generation.wrapping_add(1);
        self.events.emit(TimerEvent::StateChanged { running: false });
    }

    pub fn reset(&mut self) {
        self.pause();
        self.seconds_remaining = self.total_seconds;
        self.emit_time();
        self.events.emit(TimerEvent::ProgressUpdated { fraction: 0.0 });
    }

    /// Changing the length of a running countdown pauses it.
    pub fn update_length(&mut self, minutes: i64) {
        self.pause();
        self.initialize(minutes.max(1));
        tracing::debug!(total = self.total_seconds, "timer length updated");
        self.emit_time();
        self.events.emit(TimerEvent::ProgressUpdated { fraction: 0.0 });
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completed session when this tick finishes the countdown.
    /// Ticks delivered while paused are ignored.
    pub fn tick(&mut self) -> Option<Session> {
        if !self.is_running {
            return None;
        }
        if self.seconds_remaining == 0 {
            return Some(self.complete());
        }
        self.seconds_remaining -= 1;
        self.emit_time();
        self.events.emit(TimerEvent::ProgressUpdated {
            fraction: self.progress(),
        });
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Session {
        self.pause();
        self.events.emit(TimerEvent::ProgressUpdated { fraction: 1.0 });

        let session = Session::new(self.clock.now(), self.total_seconds);
        tracing::info!(duration = session.duration_seconds, "focus session completed");
        self.events.emit(TimerEvent::SessionCompleted { session });
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.record(&session) {
                tracing::warn!(error = %e, "failed to persist completed session");
            }
        }

        self.seconds_remaining = self.total_seconds;
        self.emit_time();
        session
    }

    fn emit_time(&mut self) {
        let text = self.formatted_remaining();
        self.events.emit(TimerEvent::TimeUpdated { text });
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("total_seconds", &self.total_seconds)
            .field("seconds_remaining", &self.seconds_remaining)
            .field("is_running", &self.is_running)
            .field("generation", &self.generation)
            .field("listeners", &self.events.len())
            .finish()
    }
}

/// `MM:SS`, zero padded. Minutes are not capped at two digits.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
