mod config;
pub mod database;
pub mod repository;

pub use config::{
    Config, DefaultsConfig, NotificationsConfig, TickerConfig,
};
pub use database::Database;
pub use repository::{TimerRepository, User, TIMERS_KEY, USER_KEY};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

/// Returns the TimeFlow data directory, creating it if needed.
///
/// `TIMEFLOW_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/timeflow[-dev]/`, with the `-dev` suffix when
/// `TIMEFLOW_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("TIMEFLOW_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TIMEFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timeflow-dev")
            } else {
                base_dir.join("timeflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// String key-value persistence.
///
/// Timer state is stored as JSON blobs under fixed keys; see
/// [`TimerRepository`].
pub trait KvStore: Send {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn kv_remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory [`KvStore`]. Clones share the same map, so a test can hand one
/// clone to a store and inspect writes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    inner: Arc<Mutex<MemoryKvInner>>,
}

#[derive(Debug, Default)]
struct MemoryKvInner {
    entries: HashMap<String, String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `kv_set`/`kv_remove` calls so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Make every subsequent write fail, simulating a full or read-only disk.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryKvInner> {
        // A poisoned map is still a usable map.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KvStore for MemoryKv {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().entries.get(key).cloned())
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::QueryFailed(format!("write to '{key}' rejected")));
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn kv_remove(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::QueryFailed(format!("delete of '{key}' rejected")));
        }
        inner.entries.remove(key);
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_kv_counts_writes() {
        let kv = MemoryKv::new();
        let observer = kv.clone();
        kv.kv_set("a", "1").unwrap();
        kv.kv_set("a", "2").unwrap();
        assert_eq!(observer.kv_get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(observer.writes(), 2);
    }

    #[test]
    fn memory_kv_can_fail_writes() {
        let kv = MemoryKv::new();
        kv.set_fail_writes(true);
        assert!(kv.kv_set("a", "1").is_err());
        assert!(kv.kv_get("a").unwrap().is_none());
        assert_eq!(kv.writes(), 0);
    }
}
