//! In-process capabilities for the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::clock::Clock;
use crate::confirm::Confirm;
use crate::error::StorageError;
use crate::i18n::Locale;
use crate::notify::{NotificationKind, NotificationPermission, Notifier, Permission};
use crate::storage::KeyValueStore;
use crate::timer::{IntervalHandle, IntervalScheduler, Mode};

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self(Arc::new(AtomicI64::new(start_ms)))
    }

    pub fn advance_secs(&self, secs: i64) {
        self.0.fetch_add(secs * 1000, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Scheduler that counts live handles.
#[derive(Debug, Default, Clone)]
pub struct CountingScheduler {
    active: Arc<AtomicUsize>,
    armed_total: Arc<AtomicUsize>,
}

impl CountingScheduler {
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn armed_total(&self) -> usize {
        self.armed_total.load(Ordering::SeqCst)
    }
}

struct CountingHandle {
    active: Arc<AtomicUsize>,
    live: bool,
}

impl IntervalHandle for CountingHandle {
    fn cancel(&mut self) {
        if self.live {
            self.live = false;
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl IntervalScheduler for CountingScheduler {
    fn schedule(&mut self) -> Box<dyn IntervalHandle> {
        self.active.fetch_add(1, Ordering::SeqCst);
        self.armed_total.fetch_add(1, Ordering::SeqCst);
        Box::new(CountingHandle {
            active: Arc::clone(&self.active),
            live: true,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier(Arc<Mutex<Vec<(NotificationKind, Mode)>>>);

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(NotificationKind, Mode)> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, mode: Mode, _locale: Locale) {
        self.0.lock().unwrap().push((kind, mode));
    }
}

pub struct FixedPermission(pub Permission);

#[async_trait]
impl NotificationPermission for FixedPermission {
    fn status(&self) -> Permission {
        self.0
    }

    async fn request(&self) -> Permission {
        self.0
    }
}

pub struct AlwaysConfirm(pub bool);

#[async_trait]
impl Confirm for AlwaysConfirm {
    async fn confirm(&self, _title: &str, _message: &str) -> bool {
        self.0
    }
}

/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Arc<Mutex<HashMap<String, String>>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.0.lock().unwrap().remove(key);
        Ok(())
    }
}
