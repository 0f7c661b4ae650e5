//! The timer collection.
//!
//! `TimerStore` owns every timer, newest first, and is the only place they
//! are mutated. Each mutation that changes the collection is mirrored to the
//! repository straight away. A failed write is logged and the in-memory
//! state stays authoritative.

use chrono::Utc;
use tracing::{debug, warn};

use crate::events::Event;
use crate::storage::TimerRepository;
use crate::timer::{Timer, TimerStatus};

pub struct TimerStore {
    timers: Vec<Timer>,
    repository: TimerRepository,
}

impl TimerStore {
    /// Open the store with whatever the repository holds.
    pub fn open(repository: TimerRepository) -> Self {
        let timers = repository.load_timers();
        debug!(count = timers.len(), "loaded timers");
        Self { timers, repository }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    /// Resolve an exact id or a unique id prefix.
    pub fn resolve_id(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            return None;
        }
        if let Some(t) = self.get(prefix) {
            return Some(&t.id);
        }
        let mut matches = self.timers.iter().filter(|t| t.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(t), None) => Some(&t.id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Timers that have not completed yet.
    pub fn active_count(&self) -> usize {
        self.timers.iter().filter(|t| !t.is_completed()).count()
    }

    pub fn running_count(&self) -> usize {
        self.timers.iter().filter(|t| t.is_running()).count()
    }

    pub fn has_completed(&self) -> bool {
        self.timers.iter().any(|t| t.is_completed())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Insert a new timer at the front.
    pub fn add(&mut self, timer: Timer) -> Event {
        let event = Event::added(&timer);
        self.timers.insert(0, timer);
        self.persist();
        event
    }

    /// Start or pause. Unknown ids and completed timers are left alone.
    pub fn toggle_by_id(&mut self, id: &str) -> Option<Event> {
        let timer = self.replace_by_id(id, Timer::toggle)?;
        Some(Event::TimerToggled {
            id: timer.id.clone(),
            status: timer.status,
            remaining_time: timer.remaining_time,
            at: Utc::now(),
        })
    }

    pub fn reset_by_id(&mut self, id: &str) -> Option<Event> {
        let timer = self.replace_by_id(id, Timer::reset)?;
        Some(Event::TimerReset {
            id: timer.id.clone(),
            remaining_time: timer.remaining_time,
            at: Utc::now(),
        })
    }

    pub fn delete_by_id(&mut self, id: &str) -> Option<Event> {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        if self.timers.len() == before {
            return None;
        }
        self.persist();
        Some(Event::TimerDeleted {
            id: id.to_string(),
            at: Utc::now(),
        })
    }

    /// Drop every completed timer, keeping the others in order.
    pub fn clear_completed(&mut self) -> Option<Event> {
        let before = self.timers.len();
        self.timers.retain(|t| t.status != TimerStatus::Completed);
        let removed = before - self.timers.len();
        if removed == 0 {
            return None;
        }
        self.persist();
        Some(Event::CompletedCleared {
            removed,
            at: Utc::now(),
        })
    }

    /// Replace the whole collection in one step.
    pub fn commit(&mut self, timers: Vec<Timer>) {
        self.timers = timers;
        self.persist();
    }

    fn replace_by_id(&mut self, id: &str, transition: fn(&Timer) -> Timer) -> Option<&Timer> {
        let index = self.timers.iter().position(|t| t.id == id)?;
        let next = transition(&self.timers[index]);
        if next == self.timers[index] {
            return None;
        }
        self.timers[index] = next;
        self.persist();
        Some(&self.timers[index])
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save_timers(&self.timers) {
            warn!(error = %e, "failed to persist timers; keeping in-memory state");
        }
    }
}
