//! Statistics module for Circura
//!
//! Derived figures over the completed-session log: totals, today's figures
//! and the consecutive-day streak. Nothing here holds state.

mod focus;

pub use focus::{
    daily_streak, daily_streak_at, summarize, summarize_at, total_minutes_focused,
    total_sessions, FocusStats,
};
