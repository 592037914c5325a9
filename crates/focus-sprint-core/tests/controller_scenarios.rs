//! Controller scenarios driven through fake capabilities.
//!
//! Every test builds a controller over a shared in-memory store, a manual
//! clock, a counting interval scheduler, a recording notifier and a scripted
//! confirmation prompt, so both the state and the side effects can be checked.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use focus_sprint_core::{
    Capabilities, Clock, Confirm, Event, IntervalHandle, IntervalScheduler, KeyValueStore, Locale,
    Mode, NotificationKind, NotificationPermission, Notifier, Permission, PersistedSnapshot,
    Recovery, Settings, SprintController, StateStore, StorageError, TickReport,
};

const T0: i64 = 1_700_000_000_000;

// ============================================================================
// Mock Capabilities
// ============================================================================

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Clone)]
struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    fn new(start_ms: i64) -> Self {
        Self(Arc::new(AtomicI64::new(start_ms)))
    }

    fn advance_ms(&self, delta_ms: i64) {
        self.0.fetch_add(delta_ms, Ordering::SeqCst);
    }

    fn advance_secs(&self, secs: i64) {
        self.advance_ms(secs * 1000);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counts live interval handles and every arm.
#[derive(Clone, Default)]
struct CountingScheduler {
    active: Arc<AtomicUsize>,
    armed_total: Arc<AtomicUsize>,
}

impl CountingScheduler {
    fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn armed_total(&self) -> usize {
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

#[derive(Clone, Default)]
struct RecordingNotifier(Arc<Mutex<Vec<(NotificationKind, Mode)>>>);

impl RecordingNotifier {
    fn sent(&self) -> Vec<(NotificationKind, Mode)> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, mode: Mode, _locale: Locale) {
        self.0.lock().unwrap().push((kind, mode));
    }
}

struct FixedPermission(Permission);

#[async_trait]
impl NotificationPermission for FixedPermission {
    fn status(&self) -> Permission {
        self.0
    }

    async fn request(&self) -> Permission {
        self.0
    }
}

/// Answers from a script and records every prompt. An exhausted script
/// declines.
#[derive(Clone, Default)]
struct ScriptedConfirm {
    answers: Arc<Mutex<VecDeque<bool>>>,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedConfirm {
    fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            prompts: Arc::default(),
        }
    }

    fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        self.prompts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

/// Shared in-memory records with a write counter.
#[derive(Clone, Default)]
struct MemoryStore {
    map: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    fn new() -> Self {
        Self::default()
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.map.lock().unwrap().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.map.lock().unwrap().remove(key);
        Ok(())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    clock: ManualClock,
    scheduler: CountingScheduler,
    notifier: RecordingNotifier,
    confirm: ScriptedConfirm,
    kv: MemoryStore,
    permission: Permission,
}

impl Harness {
    fn new() -> Self {
        Self {
            clock: ManualClock::new(T0),
            scheduler: CountingScheduler::default(),
            notifier: RecordingNotifier::default(),
            confirm: ScriptedConfirm::default(),
            kv: MemoryStore::new(),
            permission: Permission::Granted,
        }
    }

    fn with_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            confirm: ScriptedConfirm::new(answers),
            ..Self::new()
        }
    }

    /// A fresh "page load" over the same store and clock.
    fn load(&self) -> SprintController {
        let caps = Capabilities {
            clock: Box::new(self.clock.clone()),
            scheduler: Box::new(self.scheduler.clone()),
            notifier: Box::new(self.notifier.clone()),
            permission: Box::new(FixedPermission(self.permission)),
            confirm: Box::new(self.confirm.clone()),
        };
        SprintController::load(StateStore::new(self.kv.clone()), caps, Locale::En)
    }

    fn state(&self) -> StateStore {
        StateStore::new(self.kv.clone())
    }

    fn seed_settings(&self, settings: &Settings) {
        self.state().save_settings(settings).unwrap();
    }

    fn seed_tasks(&self, controller: &mut SprintController, texts: &[&str]) {
        for text in texts {
            controller.create_task(text).unwrap();
        }
    }
}

fn texts(controller: &SprintController) -> Vec<String> {
    controller
        .tasks()
        .as_slice()
        .iter()
        .map(|t| t.text.clone())
        .collect()
}

// ============================================================================
// Timer
// ============================================================================

#[test]
fn pause_then_start_keeps_time_left() {
    let h = Harness::new();
    let mut c = h.load();
    c.start();
    h.clock.advance_ms(42_300);
    let before = c.status().time_left_secs;
    let first_end = c.status().end_timestamp_ms;

    c.pause();
    h.clock.advance_secs(600);
    c.start();

    assert!((c.status().time_left_secs - before).abs() <= 1);
    assert_ne!(c.status().end_timestamp_ms, first_end);
}

#[test]
fn duration_edit_at_half_way_rescales_session() {
    let h = Harness::new();
    let mut c = h.load();
    c.start();
    h.clock.advance_secs(750);

    c.set_minutes(Mode::Focus, 30).unwrap();

    let left = c.status().time_left_secs;
    assert!((left - 900).abs() <= 1, "left = {left}");
    assert!(c.is_running());
}

#[test]
fn duration_edit_of_other_mode_leaves_current_alone() {
    let h = Harness::new();
    let mut c = h.load();
    c.start();
    h.clock.advance_secs(100);
    c.set_minutes(Mode::Break, 10).unwrap();
    assert_eq!(c.status().time_left_secs, 1400);
    assert_eq!(c.settings().break_minutes, 10);

    c.skip();
    assert_eq!(c.mode(), Mode::Break);
    assert_eq!(c.status().time_left_secs, 600);
}

#[test]
fn default_cycle_walk() {
    let h = Harness::new();
    let mut c = h.load();
    let mut visited = Vec::new();
    for _ in 0..4 {
        c.skip();
        let status = c.status();
        visited.push((status.mode, status.long_break_interval - status.cycle_completed));
    }
    assert_eq!(
        visited,
        vec![
            (Mode::Break, 2),
            (Mode::Focus, 2),
            (Mode::Break, 1),
            (Mode::Focus, 1)
        ]
    );
    c.skip();
    assert_eq!(c.mode(), Mode::LongBreak);
    c.skip();
    assert_eq!(c.mode(), Mode::Focus);
    assert_eq!(c.status().cycle_completed, 0);
}

#[test]
fn skip_never_notifies() {
    let h = Harness::new();
    h.seed_settings(&Settings {
        sound_enabled: true,
        ..Settings::default()
    });
    let mut c = h.load();
    c.start();
    c.skip();
    assert!(h.notifier.sent().is_empty());
}

#[test]
fn tick_counts_down_then_expires_once() {
    let h = Harness::new();
    h.seed_settings(&Settings {
        sound_enabled: true,
        popup_enabled: true,
        ..Settings::default()
    });
    let mut c = h.load();
    c.start();

    h.clock.advance_secs(1500);
    assert_eq!(
        c.tick(),
        TickReport::Counting {
            time_left: 0,
            total: 1500
        }
    );
    assert!(h.notifier.sent().is_empty());

    h.clock.advance_secs(1);
    match c.tick() {
        TickReport::Completed {
            completed,
            advanced,
            alerts,
        } => {
            assert!(matches!(completed, Event::TimerCompleted { mode: Mode::Focus, .. }));
            assert!(matches!(
                advanced,
                Event::ModeAdvanced {
                    from: Mode::Focus,
                    to: Mode::Break,
                    auto_started: false,
                    ..
                }
            ));
            assert_eq!(alerts, vec![NotificationKind::Sound, NotificationKind::Popup]);
        }
        other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(h.scheduler.active(), 0);
    assert!(!c.is_running());

    h.clock.advance_secs(5);
    assert_eq!(c.tick(), TickReport::Idle);
    assert_eq!(h.notifier.sent().len(), 2);
}

#[test]
fn auto_start_rearms_exactly_one_interval() {
    let h = Harness::new();
    let mut c = h.load();
    c.set_auto_start_breaks(true);
    c.start();
    h.clock.advance_secs(1501);
    c.tick();

    assert_eq!(c.mode(), Mode::Break);
    assert!(c.is_running());
    assert_eq!(h.scheduler.active(), 1);
    assert_eq!(h.scheduler.armed_total(), 2);
}

#[test]
fn at_most_one_interval_is_ever_live() {
    let h = Harness::new();
    let mut c = h.load();
    c.start();
    c.start();
    c.switch_mode(Mode::Break);
    c.start();
    c.skip();
    c.start();
    c.reset();
    c.toggle();
    assert!(h.scheduler.active() <= 1);
    c.pause();
    assert_eq!(h.scheduler.active(), 0);
}

#[test]
fn reset_clears_snapshot() {
    let h = Harness::new();
    let mut c = h.load();
    c.start();
    assert!(h.kv.raw("timer_state").is_some());
    c.reset();
    assert!(h.kv.raw("timer_state").is_none());
    assert_eq!(c.status().time_left_secs, 1500);
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn expired_snapshot_advances_once_and_notifies_once() {
    let h = Harness::new();
    h.seed_settings(&Settings {
        sound_enabled: true,
        ..Settings::default()
    });
    h.state()
        .save_snapshot(&PersistedSnapshot::running(Mode::Focus, T0 - 5_000, 3))
        .unwrap();

    let c = h.load();
    assert!(matches!(
        c.recovery(),
        Recovery::Expired {
            mode: Mode::Focus,
            ..
        }
    ));
    assert_eq!(c.mode(), Mode::Break);
    assert!(!c.is_running());
    assert_eq!(c.status().time_left_secs, 300);
    assert_eq!(h.notifier.sent(), vec![(NotificationKind::Sound, Mode::Focus)]);
    assert_eq!(h.scheduler.armed_total(), 0);
    drop(c);

    // The next load sees the advanced, paused state and stays quiet.
    let c = h.load();
    assert!(matches!(c.recovery(), Recovery::Paused { remaining_secs: 300 }));
    assert_eq!(h.notifier.sent().len(), 1);
}

#[test]
fn running_snapshot_resumes_with_same_budget() {
    let h = Harness::new();
    let mut c = h.load();
    c.start();
    drop(c);

    h.clock.advance_secs(100);
    let c = h.load();
    assert_eq!(*c.recovery(), Recovery::Resumed { time_left: 1400 });
    assert!(c.is_running());
    assert!(c.interval_armed());
    assert_eq!(c.status().time_left_secs, 1400);
}

#[test]
fn corrupt_snapshot_loads_defaults() {
    let h = Harness::new();
    let mut kv = h.kv.clone();
    kv.set( "timer_state", "{\"mode\":\"nap\"}").unwrap();
    let c = h.load();
    assert_eq!(*c.recovery(), Recovery::Fresh);
    assert_eq!(c.mode(), Mode::Focus);
}

#[test]
fn restored_countdown_is_clamped_to_interval() {
    let h = Harness::new();
    h.state()
        .save_snapshot(&PersistedSnapshot {
            mode: Mode::Break,
            running: false,
            end_timestamp_ms: None,
            remaining_secs: Some(120),
            long_break_countdown: Some(99),
        })
        .unwrap();
    let c = h.load();
    assert_eq!(c.status().cycle_completed, 0);
    assert_eq!(c.status().time_left_secs, 120);
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn invalid_settings_change_nothing() {
    let h = Harness::new();
    let mut c = h.load();
    let writes = h.kv.writes();
    assert!(c.set_minutes(Mode::Focus, 0).is_err());
    assert!(c.set_long_break_interval(0).is_err());
    assert_eq!(h.kv.writes(), writes);
    assert_eq!(*c.settings(), Settings::default());
}

#[test]
fn shrinking_interval_clamps_cycle() {
    let h = Harness::new();
    h.seed_settings(&Settings {
        long_break_interval: 5,
        ..Settings::default()
    });
    let mut c = h.load();
    c.set_long_break_interval(2).unwrap();
    assert_eq!(c.status().long_break_interval, 2);
    assert_eq!(c.status().cycle_completed, 0);
    c.skip();
    c.skip();
    c.skip();
    assert_eq!(c.mode(), Mode::LongBreak);
}

#[test]
fn settings_survive_reload() {
    let h = Harness::new();
    let mut c = h.load();
    c.set_minutes(Mode::LongBreak, 20).unwrap();
    c.set_auto_start_focus(true);
    c.set_sound_enabled(true);
    drop(c);

    let c = h.load();
    assert_eq!(c.settings().long_break_minutes, 20);
    assert!(c.settings().auto_start_focus);
    assert!(c.settings().sound_enabled);
    let raw: serde_json::Value = serde_json::from_str(&h.kv.raw("settings").unwrap()).unwrap();
    assert_eq!(raw["longBreak"], 20);
}

#[tokio::test]
async fn popup_needs_granted_permission() {
    let mut h = Harness::new();
    h.permission = Permission::Denied;
    let mut c = h.load();
    assert!(!c.set_popup_enabled(true).await);
    assert!(!c.settings().popup_enabled);

    h.permission = Permission::Granted;
    let mut c = h.load();
    assert!(c.set_popup_enabled(true).await);
    drop(c);

    // Permission revoked between sessions.
    h.permission = Permission::Unsupported;
    let c = h.load();
    assert!(!c.settings().popup_enabled);
}

#[tokio::test]
async fn set_setting_parses_text() {
    let h = Harness::new();
    let mut c = h.load();
    assert_eq!(
        c.set_setting("focus".parse().unwrap(), "50").await.unwrap(),
        "50"
    );
    assert_eq!(
        c.set_setting("autoStartBreaks".parse().unwrap(), "yes")
            .await
            .unwrap(),
        "true"
    );
    assert!(c
        .set_setting("interval".parse().unwrap(), "-2")
        .await
        .is_err());
    assert_eq!(c.status().total_secs, 3000);
}

// ============================================================================
// Tasks
// ============================================================================

#[test]
fn edit_to_empty_is_a_no_op() {
    let h = Harness::new();
    let mut c = h.load();
    h.seed_tasks(&mut c, &["A"]);
    let writes = h.kv.writes();
    assert!(c.edit_task(0, "").is_err());
    assert!(c.edit_task(0, "   ").is_err());
    assert_eq!(h.kv.writes(), writes);
    assert_eq!(texts(&c), vec!["A"]);
}

#[test]
fn reorder_first_to_last() {
    let h = Harness::new();
    let mut c = h.load();
    h.seed_tasks(&mut c, &["A", "B", "C"]);
    c.reorder_tasks(0, 2).unwrap();
    assert_eq!(texts(&c), vec!["B", "C", "A"]);

    let reloaded = h.load();
    assert_eq!(texts(&reloaded), vec!["B", "C", "A"]);
}

#[tokio::test]
async fn delete_all_on_empty_list_never_asks() {
    let h = Harness::with_answers([true]);
    let mut c = h.load();
    assert_eq!(c.delete_all_tasks().await, 0);
    assert_eq!(c.delete_completed_tasks().await, 0);
    assert!(h.confirm.prompts().is_empty());
}

#[tokio::test]
async fn declined_delete_changes_nothing() {
    let h = Harness::with_answers([false]);
    let mut c = h.load();
    h.seed_tasks(&mut c, &["Write report"]);
    let writes = h.kv.writes();

    assert_eq!(c.delete_task(0).await.unwrap(), None);
    assert_eq!(texts(&c), vec!["Write report"]);
    assert_eq!(h.kv.writes(), writes);

    let prompts = h.confirm.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, "Delete");
    assert!(prompts[0].1.contains("\"Write report\""));
}

#[tokio::test]
async fn confirmed_deletes() {
    let h = Harness::with_answers([true, true, true]);
    let mut c = h.load();
    h.seed_tasks(&mut c, &["A", "B", "C", "D"]);
    c.toggle_task(1).unwrap();
    c.toggle_task(3).unwrap();

    assert_eq!(c.delete_completed_tasks().await, 2);
    assert_eq!(texts(&c), vec!["A", "C"]);

    let removed = c.delete_task(1).await.unwrap().unwrap();
    assert_eq!(removed.text, "C");

    assert_eq!(c.delete_all_tasks().await, 1);
    assert!(c.tasks().is_empty());
    assert_eq!(h.confirm.prompts().len(), 3);
}

#[tokio::test]
async fn delete_out_of_range_never_asks() {
    let h = Harness::with_answers([true]);
    let mut c = h.load();
    assert!(c.delete_task(0).await.is_err());
    assert!(h.confirm.prompts().is_empty());
}

// ============================================================================
// Language
// ============================================================================

#[tokio::test]
async fn saved_language_drives_prompts() {
    let h = Harness::with_answers([false]);
    let mut c = h.load();
    assert_eq!(c.locale(), Locale::En);
    c.set_locale(Locale::PtBr);
    h.seed_tasks(&mut c, &["Ler"]);
    drop(c);

    let mut c = h.load();
    assert_eq!(c.locale(), Locale::PtBr);
    c.delete_task(0).await.unwrap();
    assert_eq!(h.confirm.prompts()[0].0, "Excluir");
}
