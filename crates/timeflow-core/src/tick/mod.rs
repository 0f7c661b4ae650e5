//! Tick engine.
//!
//! One tick advances every running timer by one logical second. The whole
//! collection is recomputed, each completion is dispatched, and the result
//! is committed to the store in a single replace. A tick that finds nothing
//! running does nothing at all.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TickEngine::new(store, dispatcher);
//! let report = engine.tick(); // call once per second
//! ```
//!
//! [`Ticker`] drives an engine from a tokio interval.

mod ticker;

pub use ticker::{Command, TickCadence, Ticker};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::Event;
use crate::notify::{DispatchReport, NotificationDispatcher};
use crate::store::TimerStore;
use crate::timer::Timer;

/// How many seconds a tick is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    /// Every tick is exactly one second, however late it fires.
    #[default]
    Fixed,
    /// Each tick advances by the whole seconds of real time since the last
    /// one; the sub-second remainder carries over.
    WallClock,
}

/// Result of advancing a collection, before anything is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub timers: Vec<Timer>,
    /// True when at least one timer was running.
    pub changed: bool,
    /// Timers that reached zero on this tick, in collection order.
    pub completed: Vec<Timer>,
}

/// Advance every running timer by `seconds`. Pure.
pub fn advance_all(timers: &[Timer], seconds: u64) -> TickOutcome {
    let mut changed = false;
    let mut completed = Vec::new();
    let next = timers
        .iter()
        .map(|timer| {
            if !timer.is_running() {
                return timer.clone();
            }
            changed = true;
            let advanced = timer.advance_by(seconds);
            if advanced.is_completed() {
                completed.push(advanced.clone());
            }
            advanced
        })
        .collect();
    TickOutcome {
        timers: next,
        changed,
        completed,
    }
}

/// What one tick did.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub changed: bool,
    /// Timers still running after the tick.
    pub running: usize,
    pub completed: Vec<Timer>,
    pub dispatches: Vec<DispatchReport>,
}

impl TickReport {
    /// Events for subscribers: one per completion, then the tick itself.
    pub fn events(&self) -> Vec<Event> {
        if !self.changed {
            return Vec::new();
        }
        let mut events: Vec<Event> = self.completed.iter().map(Event::completed).collect();
        events.push(Event::Ticked {
            running: self.running,
            at: Utc::now(),
        });
        events
    }
}

/// The store plus the dispatcher its completions go to.
pub struct TickEngine {
    store: TimerStore,
    dispatcher: NotificationDispatcher,
}

impl TickEngine {
    pub fn new(store: TimerStore, dispatcher: NotificationDispatcher) -> Self {
        Self { store, dispatcher }
    }

    pub fn store(&self) -> &TimerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TimerStore {
        &mut self.store
    }

    pub fn dispatcher_mut(&mut self) -> &mut NotificationDispatcher {
        &mut self.dispatcher
    }

    /// Advance one logical second.
    pub fn tick(&mut self) -> TickReport {
        self.tick_by(1)
    }

    pub fn tick_by(&mut self, seconds: u64) -> TickReport {
        let outcome = advance_all(self.store.timers(), seconds);
        if !outcome.changed || seconds == 0 {
            return TickReport::default();
        }

        // Alerts go out before the new collection is written.
        let dispatches = outcome
            .completed
            .iter()
            .map(|timer| {
                info!(id = %timer.id, title = %timer.title, "timer completed");
                self.dispatcher.dispatch(&timer.title)
            })
            .collect();

        let running = outcome.timers.iter().filter(|t| t.is_running()).count();
        self.store.commit(outcome.timers);
        debug!(seconds, running, completed = outcome.completed.len(), "tick committed");

        TickReport {
            changed: true,
            running,
            completed: outcome.completed,
            dispatches,
        }
    }
}
