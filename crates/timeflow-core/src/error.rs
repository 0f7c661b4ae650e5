//! Core error types for timeflow-core.
//!
//! Timer operations themselves never fail. These types cover the edges that
//! can: opening storage, reading and writing configuration, delivering
//! notifications, and talking to a running ticker.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timeflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification or sound delivery errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Ticker control errors
    #[error("Ticker error: {0}")]
    Ticker(#[from] TickerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another process
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),

    /// Record could not be encoded
    #[error("Failed to encode record '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Notification delivery errors. Always logged, never surfaced to users.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The desktop notification service rejected the request
    #[error("System notification failed: {0}")]
    Notification(String),

    /// No usable audio player was found
    #[error("No audio player available for {0}")]
    NoPlayer(String),

    /// The sound file is missing
    #[error("Sound file not found: {0}")]
    MissingSound(PathBuf),

    /// None of the platform default sounds exist
    #[error("No default sound file found")]
    NoDefaultSound,

    /// Spawning the audio player failed
    #[error("Audio playback failed: {0}")]
    Playback(#[from] std::io::Error),
}

/// Errors talking to a running ticker.
#[derive(Error, Debug)]
pub enum TickerError {
    /// The ticker task has already stopped
    #[error("Ticker is no longer running")]
    Stopped,

    /// The ticker task panicked or was aborted
    #[error("Ticker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
