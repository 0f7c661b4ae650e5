use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Timer, TimerKind, TimerStatus};

/// Every state change in the system produces an Event.
/// The CLI prints them; ticker subscribers receive them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerAdded {
        id: String,
        title: String,
        kind: TimerKind,
        total_duration: u64,
        at: DateTime<Utc>,
    },
    TimerToggled {
        id: String,
        status: TimerStatus,
        remaining_time: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        id: String,
        remaining_time: u64,
        at: DateTime<Utc>,
    },
    TimerDeleted {
        id: String,
        at: DateTime<Utc>,
    },
    CompletedCleared {
        removed: usize,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero on this tick.
    TimerCompleted {
        id: String,
        title: String,
        at: DateTime<Utc>,
    },
    /// One tick committed; lists how many timers were running.
    Ticked {
        running: usize,
        at: DateTime<Utc>,
    },
    /// Full collection, newest first.
    Snapshot {
        timers: Vec<Timer>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn added(timer: &Timer) -> Self {
        Event::TimerAdded {
            id: timer.id.clone(),
            title: timer.title.clone(),
            kind: timer.kind,
            total_duration: timer.total_duration,
            at: Utc::now(),
        }
    }

    pub fn completed(timer: &Timer) -> Self {
        Event::TimerCompleted {
            id: timer.id.clone(),
            title: timer.title.clone(),
            at: Utc::now(),
        }
    }
}
