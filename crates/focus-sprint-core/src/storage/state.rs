//! Typed records on top of a [`KeyValueStore`].
//!
//! Reads never fail: a missing record is `None`, and a record that does not
//! parse is logged and treated as missing. Writes report their error so the
//! caller can decide whether to care.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::KeyValueStore;
use crate::error::StorageError;
use crate::i18n::Locale;
use crate::settings::Settings;
use crate::tasks::TaskList;
use crate::timer::PersistedSnapshot;

pub const KEY_TIMER_STATE: &str = "timer_state";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_TASKS: &str = "tasks";
pub const KEY_LANGUAGE: &str = "language";

pub struct StateStore {
    kv: Box<dyn KeyValueStore>,
}

impl StateStore {
    pub fn new(kv: impl KeyValueStore + 'static) -> Self {
        Self { kv: Box::new(kv) }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to read record");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "ignoring corrupt record");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.kv.set(key, &json)
    }

    // ── Timer snapshot ───────────────────────────────────────────────

    /// A record whose `running` flag lacks its matching field counts as corrupt.
    pub fn load_snapshot(&self) -> Option<PersistedSnapshot> {
        let snapshot: PersistedSnapshot = self.read_json(KEY_TIMER_STATE)?;
        if snapshot.timing().is_none() {
            warn!(key = KEY_TIMER_STATE, "ignoring incomplete timer snapshot");
            return None;
        }
        Some(snapshot)
    }

    pub fn save_snapshot(&mut self, snapshot: &PersistedSnapshot) -> Result<(), StorageError> {
        self.write_json(KEY_TIMER_STATE, snapshot)
    }

    pub fn clear_snapshot(&mut self) -> Result<(), StorageError> {
        self.kv.remove(KEY_TIMER_STATE)
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn load_settings(&self) -> Option<Settings> {
        self.read_json(KEY_SETTINGS)
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.write_json(KEY_SETTINGS, settings)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn load_tasks(&self) -> Option<TaskList> {
        self.read_json::<TaskList>(KEY_TASKS)
            .map(|list| TaskList::from_tasks(list.as_slice().to_vec()))
    }

    pub fn save_tasks(&mut self, tasks: &TaskList) -> Result<(), StorageError> {
        self.write_json(KEY_TASKS, tasks)
    }

    // ── Language ─────────────────────────────────────────────────────

    /// Stored as the bare tag, not JSON.
    pub fn load_locale(&self) -> Option<Locale> {
        let raw = self.read_raw(KEY_LANGUAGE)?;
        match raw.trim().parse() {
            Ok(locale) => Some(locale),
            Err(e) => {
                warn!(key = KEY_LANGUAGE, error = %e, "ignoring unknown language");
                None
            }
        }
    }

    pub fn save_locale(&mut self, locale: Locale) -> Result<(), StorageError> {
        self.kv.set(KEY_LANGUAGE, locale.tag())
    }
}
