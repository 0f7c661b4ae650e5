pub mod config;
pub mod permission;
pub mod run;
pub mod timer;

use timeflow_core::storage::Database;
use timeflow_core::{Config, NotificationDispatcher, TickEngine, TimerRepository, TimerStore};

/// Open the on-disk store and a dispatcher built from the config.
pub(crate) fn open_engine(config: &Config) -> Result<TickEngine, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let store = TimerStore::open(TimerRepository::new(db));
    let dispatcher = NotificationDispatcher::from_config(&config.notifications);
    Ok(TickEngine::new(store, dispatcher))
}

/// Print a serializable value as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
