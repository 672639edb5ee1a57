//! Completed focus session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed focus session.
///
/// Created once, when a countdown reaches zero, and never modified afterwards.
/// The serialized field names match the persisted `completedSessions` log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// When the session ended.
    #[serde(rename = "date")]
    pub end: DateTime<Utc>,
    /// Length of the session in seconds.
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
}

impl Session {
    pub fn new(end: DateTime<Utc>, duration_seconds: u64) -> Self {
        Self {
            end,
            duration_seconds,
        }
    }
}
