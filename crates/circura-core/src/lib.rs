//! # Circura Core Library
//!
//! Core logic of the Circura focus timer. Front-ends (the `circura` CLI, or
//! any GUI) are thin layers that subscribe to timer events and call into
//! this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: an in-memory countdown state machine, driven once per
//!   second by an injectable tick scheduler
//! - **Session Store**: settings and the append-only log of completed
//!   sessions over a key-value backend (SQLite on disk)
//! - **Stats**: pure functions deriving totals and the daily streak from
//!   the session log
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Countdown state machine
//! - [`FocusTimer`]: Engine plus its tick source
//! - [`SessionStore`]: Settings and session persistence
//! - [`FocusStats`]: Derived statistics
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod notify;
pub mod quotes;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, QuoteError};
pub use events::{EventBus, ListenerId, TimerEvent};
pub use notify::{Alert, CompletionAlerts, NotificationDispatcher};
pub use quotes::{Quote, QuoteCadence, QuoteFeed, QuoteSource, ZenQuotesClient};
pub use session::Session;
pub use stats::FocusStats;
pub use storage::{Config, Database, KeyValueStore, MemoryStore, SessionStore};
pub use timer::{
    FocusTimer, ManualScheduler, SessionSink, TickScheduler, TimerEngine, TimerSnapshot,
    TokioScheduler,
};
