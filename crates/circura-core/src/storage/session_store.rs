//! Settings and the append-only session log.
//!
//! Persisted keys:
//!
//! | Key | Value |
//! |---|---|
//! | `timerLength` | integer minutes |
//! | `notificationsEnabled` | `true` / `false` |
//! | `completedSessions` | JSON array of `{date, duration}` |
//!
//! Reads never fail: missing, malformed or unreadable values fall back to
//! their defaults (an unreadable session log reads as empty).

use std::sync::Arc;

use super::KeyValueStore;
use crate::error::Result;
use crate::session::Session;
use crate::timer::SessionSink;

/// Timer length used when none (or a non-positive one) is stored.
pub const DEFAULT_TIMER_LENGTH: i64 = 25;

const TIMER_LENGTH_KEY: &str = "timerLength";
const NOTIFICATIONS_KEY: &str = "notificationsEnabled";
const SESSIONS_KEY: &str = "completedSessions";

/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_shared(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn timer_length(&self) -> i64 {
        self.read(TIMER_LENGTH_KEY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_TIMER_LENGTH)
    }

    /// Stored as given; non-positive values read back as the default.
    pub fn set_timer_length(&self, minutes: i64) -> Result<()> {
        self.backend.set(TIMER_LENGTH_KEY, &minutes.to_string())?;
        Ok(())
    }

    pub fn notifications_enabled(&self) -> bool {
        self.read(NOTIFICATIONS_KEY)
            .and_then(|raw| raw.trim().parse::<bool>().ok())
            .unwrap_or(false)
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.backend.set(NOTIFICATIONS_KEY, &enabled.to_string())?;
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// The full log, in the order sessions were saved.
    pub fn load_sessions(&self) -> Vec<Session> {
        self.read(SESSIONS_KEY)
            .map(|raw| decode_sessions(&raw))
            .unwrap_or_default()
    }

    /// Append `session` and write the whole log back in one write.
    ///
    /// A backend read failure aborts the save so the existing log is never
    /// overwritten; only an undecodable log is replaced.
    ///
    /// Not safe against a second concurrent writer: two interleaved calls can
    /// lose one of the appends.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self
            .backend
            .get(SESSIONS_KEY)?
            .map(|raw| decode_sessions(&raw))
            .unwrap_or_default();
        sessions.push(*session);
        let encoded = serde_json::to_string(&sessions)?;
        self.backend.set(SESSIONS_KEY, &encoded)?;
        tracing::debug!(count = sessions.len(), "session log saved");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read setting");
                None
            }
        }
    }
}

fn decode_sessions(raw: &str) -> Vec<Session> {
    match serde_json::from_str(raw) {
        Ok(sessions) => sessions,
        Err(e) => {
            tracing::warn!(error = %e, "stored session log is corrupt, treating as empty");
            Vec::new()
        }
    }
}

impl SessionSink for SessionStore {
    fn record(&self, session: &Session) -> Result<()> {
        self.save_session(session)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
