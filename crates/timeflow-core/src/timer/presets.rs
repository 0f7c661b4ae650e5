//! Creation helpers: duration input, quick-start presets, clock formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::Timer;
use super::tags::{Mood, TimerColor};

/// Hours/minutes/seconds as entered by the user.
///
/// Fields are signed so that whatever the user typed can be carried through;
/// the timer constructor clamps the resulting total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DurationInput {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl DurationInput {
    pub fn new(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

/// One-click countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickStart {
    Break,
    Reading,
    Pomodoro,
    DeepWork,
}

impl QuickStart {
    pub const ALL: [QuickStart; 4] = [
        QuickStart::Break,
        QuickStart::Reading,
        QuickStart::Pomodoro,
        QuickStart::DeepWork,
    ];

    pub fn minutes(self) -> i64 {
        match self {
            QuickStart::Break => 5,
            QuickStart::Reading => 10,
            QuickStart::Pomodoro => 25,
            QuickStart::DeepWork => 60,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            QuickStart::Break => "Take a break",
            QuickStart::Reading => "Light reading",
            QuickStart::Pomodoro => "Pomodoro focus",
            QuickStart::DeepWork => "Deep work",
        }
    }

    fn key(self) -> &'static str {
        match self {
            QuickStart::Break => "break",
            QuickStart::Reading => "reading",
            QuickStart::Pomodoro => "pomodoro",
            QuickStart::DeepWork => "deep-work",
        }
    }

    /// A running countdown with a random accent and the `energy` mood.
    pub fn timer(self) -> Timer {
        Timer::countdown(
            self.title(),
            self.minutes() * 60,
            TimerColor::random(),
            Mood::Energy,
        )
    }
}

impl fmt::Display for QuickStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for QuickStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|q| q.key() == raw)
            .ok_or_else(|| {
                format!("unknown preset '{s}' (expected break, reading, pomodoro or deep-work)")
            })
    }
}

/// `H:MM:SS` once an hour is reached, `MM:SS` below.
pub fn format_clock(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
