//! # Focus Sprint Core Library
//!
//! Business logic for the Focus Sprint Pomodoro timer. Hosts (the
//! `focus-sprint` CLI, or anything else) supply a clock, a 1 Hz tick, alert
//! delivery and a confirmation prompt; the core owns every piece of state.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine over Focus, Break and
//!   Long Break. The caller invokes `tick()` once per second while running
//! - **Recovery**: Rebuilds the session from a persisted snapshot, fast
//!   forwarding through an expiry that happened while the host was closed
//! - **Storage**: SQLite key-value records for state and TOML host configuration
//! - **Controller**: The single owner that wires the above to host capabilities
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SprintController`]: Every user-facing operation
//! - [`StateStore`]: Typed persisted records
//! - [`AppConfig`]: Host configuration management

pub mod clock;
pub mod confirm;
pub mod controller;
pub mod error;
pub mod events;
pub mod i18n;
pub mod notify;
pub mod settings;
pub mod storage;
pub mod tasks;
pub mod timer;

#[cfg(test)]
mod testing;

pub use clock::{Clock, SystemClock};
pub use confirm::Confirm;
pub use controller::{Capabilities, SprintController, TickReport};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use i18n::{translate, translate_with, Locale, MessageKey};
pub use notify::{NotificationKind, NotificationPermission, Notifier, Permission};
pub use settings::{SettingKey, Settings};
pub use storage::{AppConfig, Database, KeyValueStore, StateStore};
pub use tasks::{Task, TaskList};
pub use timer::{
    IntervalHandle, IntervalScheduler, Mode, PersistedSnapshot, Recovery, TimerEngine,
    TimerStatus,
};
