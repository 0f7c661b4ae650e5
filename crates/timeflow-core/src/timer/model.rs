//! Timer entity and its state transitions.
//!
//! Every transition is a pure function from one `Timer` to the next. Nothing
//! here touches the clock, storage, or the notification layer; the tick
//! engine and the store decide when a transition is applied.
//!
//! ## State Transitions
//!
//! ```text
//! Running <-> Paused          (toggle)
//! Idle    ->  Running         (toggle)
//! Running ->  Completed       (advance, countdown reaching zero)
//! *       ->  Idle            (reset)
//! ```

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::tags::{Mood, TimerColor};

pub const DEFAULT_COUNTDOWN_TITLE: &str = "Untitled task";
pub const DEFAULT_STOPWATCH_TITLE: &str = "Focus session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimerKind {
    Countdown,
    Stopwatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerStatus {
    pub fn label(self) -> &'static str {
        match self {
            TimerStatus::Idle => "not started",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "done",
        }
    }
}

/// A single countdown or stopwatch.
///
/// `remaining_time` is the displayed value in seconds: time left for a
/// countdown, time elapsed for a stopwatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TimerKind,
    pub total_duration: u64,
    pub remaining_time: u64,
    pub status: TimerStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "super::tags::as_style_key")]
    pub color: TimerColor,
    #[serde(default)]
    pub mood: Mood,
}

impl Timer {
    /// Create a running countdown.
    ///
    /// Non-positive durations are accepted and clamped to zero; such a timer
    /// completes on the first tick after creation.
    pub fn countdown(
        title: impl Into<String>,
        total_seconds: i64,
        color: TimerColor,
        mood: Mood,
    ) -> Self {
        let total = total_seconds.max(0) as u64;
        Self {
            id: new_id(),
            title: title_or(title.into(), DEFAULT_COUNTDOWN_TITLE),
            kind: TimerKind::Countdown,
            total_duration: total,
            remaining_time: total,
            status: TimerStatus::Running,
            created_at: created_now(),
            color,
            mood,
        }
    }

    /// Create a running stopwatch starting at zero.
    pub fn stopwatch(title: impl Into<String>, color: TimerColor, mood: Mood) -> Self {
        Self {
            id: new_id(),
            title: title_or(title.into(), DEFAULT_STOPWATCH_TITLE),
            kind: TimerKind::Stopwatch,
            total_duration: 0,
            remaining_time: 0,
            status: TimerStatus::Running,
            created_at: created_now(),
            color,
            mood,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_completed(&self) -> bool {
        self.status == TimerStatus::Completed
    }

    /// 0.0 .. 1.0 elapsed fraction. Stopwatches always report a full bar.
    pub fn progress(&self) -> f64 {
        match self.kind {
            TimerKind::Stopwatch => 1.0,
            TimerKind::Countdown => {
                if self.total_duration == 0 {
                    return 1.0;
                }
                1.0 - (self.remaining_time as f64 / self.total_duration as f64)
            }
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// State one second later. Identity unless running.
    pub fn advance(&self) -> Self {
        self.advance_by(1)
    }

    /// State `seconds` seconds later. Identity unless running.
    pub fn advance_by(&self, seconds: u64) -> Self {
        if self.status != TimerStatus::Running || seconds == 0 {
            return self.clone();
        }
        let mut next = self.clone();
        match self.kind {
            TimerKind::Countdown => {
                next.remaining_time = self.remaining_time.saturating_sub(seconds);
                if next.remaining_time == 0 {
                    next.status = TimerStatus::Completed;
                }
            }
            TimerKind::Stopwatch => {
                next.remaining_time = self.remaining_time.saturating_add(seconds);
            }
        }
        next
    }

    /// Running pauses; paused or idle starts. A completed timer stays put.
    pub fn toggle(&self) -> Self {
        let status = match self.status {
            TimerStatus::Running => TimerStatus::Paused,
            TimerStatus::Paused | TimerStatus::Idle => TimerStatus::Running,
            TimerStatus::Completed => TimerStatus::Completed,
        };
        Self {
            status,
            ..self.clone()
        }
    }

    /// Back to idle with the starting value restored.
    pub fn reset(&self) -> Self {
        let remaining_time = match self.kind {
            TimerKind::Countdown => self.total_duration,
            TimerKind::Stopwatch => 0,
        };
        Self {
            status: TimerStatus::Idle,
            remaining_time,
            ..self.clone()
        }
    }
}

/// Stored records keep milliseconds, so creation time does too.
fn created_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn title_or(title: String, fallback: &str) -> String {
    if title.trim().is_empty() {
        fallback.to_string()
    } else {
        title
    }
}
