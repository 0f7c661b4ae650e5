//! # TimeFlow Core Library
//!
//! This library provides the core logic for TimeFlow, a multi-timer focus
//! tracker. Countdowns and stopwatches live side by side in one collection,
//! are advanced by a one-second tick, and raise a notification and a sound
//! when a countdown finishes. The `timeflow` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Timer**: Pure value type; every transition returns a new timer
//! - **Store**: The single owner of the collection, persisted on each change
//! - **Tick**: Advances running timers once per second and commits once per tick
//! - **Notify**: Turns a completion into a system notification and a sound cue
//! - **Storage**: SQLite key-value records and TOML configuration
//!
//! ## Key Components
//!
//! - [`Timer`]: Countdown or stopwatch state machine
//! - [`TimerStore`]: Ordered, persisted timer collection
//! - [`TickEngine`]: Compute, dispatch, commit
//! - [`Ticker`]: Drives an engine from a tokio interval
//! - [`NotificationDispatcher`]: Completion alerts

pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod store;
pub mod tick;
pub mod timer;

pub use error::{ConfigError, CoreError, NotifyError, StorageError, TickerError};
pub use events::Event;
pub use notify::{NotificationDispatcher, NotificationPermission};
pub use storage::{Config, Database, KvStore, MemoryKv, TimerRepository, User};
pub use store::TimerStore;
pub use tick::{advance_all, Command, TickCadence, TickEngine, TickMode, TickReport, Ticker};
pub use timer::{
    format_clock, DurationInput, Mood, QuickStart, Timer, TimerColor, TimerKind, TimerStatus,
};
