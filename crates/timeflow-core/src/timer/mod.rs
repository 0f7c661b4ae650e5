mod model;
mod presets;
mod tags;

pub use model::{
    Timer, TimerKind, TimerStatus, DEFAULT_COUNTDOWN_TITLE, DEFAULT_STOPWATCH_TITLE,
};
pub use presets::{format_clock, DurationInput, QuickStart};
pub use tags::{Mood, TimerColor};
