mod config;
pub mod database;
mod state;

pub use config::{AppConfig, NotificationsConfig};
pub use database::Database;
pub use state::{StateStore, KEY_LANGUAGE, KEY_SETTINGS, KEY_TASKS, KEY_TIMER_STATE};

use std::path::PathBuf;

use crate::error::StorageError;

/// Durable string key-value records that survive a restart.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Returns `$FOCUS_SPRINT_DATA_DIR` if set, else `~/.config/focus-sprint/`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("FOCUS_SPRINT_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("focus-sprint"),
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
