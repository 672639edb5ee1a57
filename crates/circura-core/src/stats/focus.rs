//! Totals and the consecutive-day streak over the session log.
//!
//! Everything here is a pure function of a session slice. Calendar figures
//! bucket sessions by the local date of their end time; the `*_at` variants
//! take an explicit "now" so the time zone is under the caller's control.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Aggregate figures for the stats view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusStats {
    pub total_sessions: u64,
    pub total_minutes_focused: u64,
    pub daily_streak: u32,
    pub sessions_today: u64,
    pub minutes_today: u64,
}

pub fn total_sessions(sessions: &[Session]) -> u64 {
    sessions.len() as u64
}

/// Whole minutes; the fractional remainder is dropped.
pub fn total_minutes_focused(sessions: &[Session]) -> u64 {
    sum_seconds(sessions.iter()) / 60
}

pub fn daily_streak(sessions: &[Session]) -> u32 {
    daily_streak_at(sessions, &Local::now())
}

/// Count of consecutive days with at least one session, ending today or,
/// if nothing has been done yet today, yesterday.
pub fn daily_streak_at<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> u32 {
    let tz = now.timezone();
    let days: HashSet<NaiveDate> = sessions
        .iter()
        .map(|s| s.end.with_timezone(&tz).date_naive())
        .collect();
    if days.is_empty() {
        return 0;
    }

    let today = now.date_naive();
    let anchor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    let mut current = Some(anchor);
    while let Some(day) = current.filter(|d| days.contains(d)) {
        streak += 1;
        current = day.pred_opt();
    }
    streak
}

pub fn summarize(sessions: &[Session]) -> FocusStats {
    summarize_at(sessions, &Local::now())
}

pub fn summarize_at<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> FocusStats {
    let tz = now.timezone();
    let today = now.date_naive();
    let todays: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.end.with_timezone(&tz).date_naive() == today)
        .collect();

    FocusStats {
        total_sessions: total_sessions(sessions),
        total_minutes_focused: total_minutes_focused(sessions),
        daily_streak: daily_streak_at(sessions, now),
        sessions_today: todays.len() as u64,
        minutes_today: sum_seconds(todays.into_iter()) / 60,
    }
}

fn sum_seconds<'a>(sessions: impl Iterator<Item = &'a Session>) -> u64 {
    sessions.map(|s| s.duration_seconds).sum()
}
