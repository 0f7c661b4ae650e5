//! Timer and user records on top of a [`KvStore`].
//!
//! Reads never fail: a missing or unreadable record loads as empty. Writes
//! return their error so the caller can log it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::KvStore;
use crate::error::StorageError;
use crate::timer::{Timer, TimerKind};

pub const TIMERS_KEY: &str = "timeflow_data_timers";
pub const USER_KEY: &str = "timeflow_data_user";

/// The locally remembered user. No authentication is attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub avatar: String,
}

pub struct TimerRepository {
    kv: Box<dyn KvStore>,
}

impl TimerRepository {
    pub fn new(kv: impl KvStore + 'static) -> Self {
        Self { kv: Box::new(kv) }
    }

    /// All stored timers, newest first. Empty when absent or corrupt.
    ///
    /// A countdown whose remaining time exceeds its duration is clamped back
    /// into range.
    pub fn load_timers(&self) -> Vec<Timer> {
        let mut timers = self.read::<Vec<Timer>>(TIMERS_KEY).unwrap_or_default();
        timers.iter_mut().for_each(clamp_countdown);
        timers
    }

    pub fn save_timers(&self, timers: &[Timer]) -> Result<(), StorageError> {
        let json = serde_json::to_string(timers).map_err(|source| StorageError::Encode {
            key: TIMERS_KEY.to_string(),
            source,
        })?;
        self.kv.kv_set(TIMERS_KEY, &json)
    }

    pub fn load_user(&self) -> Option<User> {
        self.read(USER_KEY)
    }

    /// Store the current user, or forget it when `None`.
    pub fn save_user(&self, user: Option<&User>) -> Result<(), StorageError> {
        match user {
            Some(user) => {
                let json = serde_json::to_string(user).map_err(|source| StorageError::Encode {
                    key: USER_KEY.to_string(),
                    source,
                })?;
                self.kv.kv_set(USER_KEY, &json)
            }
            None => self.kv.kv_remove(USER_KEY),
        }
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let raw = match self.kv.kv_get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read stored record");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable stored record");
                None
            }
        }
    }
}

fn clamp_countdown(timer: &mut Timer) {
    if timer.kind == TimerKind::Countdown && timer.remaining_time > timer.total_duration {
        warn!(
            id = %timer.id,
            remaining = timer.remaining_time,
            total = timer.total_duration,
            "stored countdown out of range; clamping remaining time"
        );
        timer.remaining_time = timer.total_duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKv;
    use crate::timer::{Mood, TimerColor};

    #[test]
    fn missing_timers_load_empty() {
        let repo = TimerRepository::new(MemoryKv::new());
        assert!(repo.load_timers().is_empty());
    }

    #[test]
    fn corrupt_timers_load_empty() {
        let kv = MemoryKv::new();
        kv.kv_set(TIMERS_KEY, "{not json").unwrap();
        let repo = TimerRepository::new(kv.clone());
        assert!(repo.load_timers().is_empty());

        kv.kv_set(TIMERS_KEY, r#"[{"id": 3}]"#).unwrap();
        assert!(repo.load_timers().is_empty());
    }

    #[test]
    fn timers_round_trip_in_order() {
        let repo = TimerRepository::new(MemoryKv::new());
        let timers = vec![
            Timer::countdown("b", 60, TimerColor::Pink, Mood::Relax),
            Timer::stopwatch("a", TimerColor::Blue, Mood::Focus),
        ];
        repo.save_timers(&timers).unwrap();
        assert_eq!(repo.load_timers(), timers);
    }

    #[test]
    fn out_of_range_countdown_is_clamped_on_load() {
        let kv = MemoryKv::new();
        kv.kv_set(
            TIMERS_KEY,
            r#"[
                {"id": "c", "title": "Over", "type": "COUNTDOWN", "totalDuration": 5,
                 "remainingTime": 50, "status": "RUNNING", "createdAt": 1700000000000},
                {"id": "s", "title": "Watch", "type": "STOPWATCH", "totalDuration": 0,
                 "remainingTime": 50, "status": "PAUSED", "createdAt": 1700000000000}
            ]"#,
        )
        .unwrap();

        let timers = TimerRepository::new(kv).load_timers();
        assert_eq!(timers[0].remaining_time, 5);
        assert_eq!(timers[0].total_duration, 5);
        // Stopwatches have no upper bound.
        assert_eq!(timers[1].remaining_time, 50);
    }

    #[test]
    fn user_record_can_be_cleared() {
        let repo = TimerRepository::new(MemoryKv::new());
        assert!(repo.load_user().is_none());

        let user = User {
            username: "mika".into(),
            email: "mika@example.com".into(),
            avatar: "https://example.com/a.png".into(),
        };
        repo.save_user(Some(&user)).unwrap();
        assert_eq!(repo.load_user(), Some(user));

        repo.save_user(None).unwrap();
        assert!(repo.load_user().is_none());
    }

    #[test]
    fn failed_write_is_reported() {
        let kv = MemoryKv::new();
        kv.set_fail_writes(true);
        let repo = TimerRepository::new(kv);
        assert!(repo.save_timers(&[]).is_err());
    }
}
