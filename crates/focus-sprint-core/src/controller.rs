//! The single owner of all session state.
//!
//! `SprintController` ties the timer engine, the settings, the task list and
//! the language to the host capabilities. Every operation follows the same
//! shape: validate, mutate, manage the tick interval, notify, persist. Nothing
//! outside the controller can touch the state directly.

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::confirm::Confirm;
use crate::error::{StorageError, ValidationError};
use crate::events::Event;
use crate::i18n::{translate, translate_with, Locale, MessageKey};
use crate::notify::{self, NotificationKind, NotificationPermission, Notifier};
use crate::settings::{self, minutes_to_secs, SettingKey, Settings};
use crate::storage::StateStore;
use crate::tasks::{Task, TaskList};
use crate::timer::{
    IntervalScheduler, IntervalSlot, Mode, Recovery, TickOutcome, TimerEngine, TimerStatus,
};

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickReport {
    Idle,
    Counting { time_left: i64, total: i64 },
    /// The session ran out: alerts fired and the cycle moved on.
    Completed {
        completed: Event,
        advanced: Event,
        alerts: Vec<NotificationKind>,
    },
}

/// Everything the controller needs from its host.
pub struct Capabilities {
    pub clock: Box<dyn Clock>,
    pub scheduler: Box<dyn IntervalScheduler>,
    pub notifier: Box<dyn Notifier>,
    pub permission: Box<dyn NotificationPermission>,
    pub confirm: Box<dyn Confirm>,
}

pub struct SprintController {
    engine: TimerEngine,
    settings: Settings,
    tasks: TaskList,
    locale: Locale,
    store: StateStore,
    caps: Capabilities,
    interval: IntervalSlot,
    recovery: Recovery,
}

impl SprintController {
    /// Read every record from `store` and rebuild the session.
    ///
    /// `fallback_locale` is used when no language has been saved. A running
    /// session resumes with its interval armed; one that ended while nobody
    /// was watching notifies once and advances.
    pub fn load(store: StateStore, caps: Capabilities, fallback_locale: Locale) -> Self {
        let mut settings = store.load_settings().unwrap_or_default();
        let mut popup_revoked = false;
        if settings.popup_enabled && !caps.permission.status().is_granted() {
            settings.popup_enabled = false;
            popup_revoked = true;
        }
        let tasks = store.load_tasks().unwrap_or_default();
        let locale = store.load_locale().unwrap_or(fallback_locale);

        let mut engine = TimerEngine::new(
            settings.durations(),
            settings.long_break_interval,
            settings.auto_start(),
        );
        let now = caps.clock.now_ms();
        let recovery = match store.load_snapshot() {
            Some(snapshot) => engine.restore(&snapshot, now),
            None => Recovery::Fresh,
        };

        let mut controller = Self {
            engine,
            settings,
            tasks,
            locale,
            store,
            caps,
            interval: IntervalSlot::default(),
            recovery,
        };

        if popup_revoked {
            debug!("popup alerts disabled: permission not granted");
            controller.persist_settings();
        }

        match controller.recovery.clone() {
            Recovery::Fresh => debug!("no saved session"),
            Recovery::Paused { remaining_secs } => {
                info!(mode = %controller.engine.mode(), remaining_secs, "restored paused session");
            }
            Recovery::Resumed { time_left } => {
                info!(mode = %controller.engine.mode(), time_left, "resumed running session");
                controller.persist_snapshot();
            }
            Recovery::Expired { mode, .. } => {
                info!(%mode, next = %controller.engine.mode(), "session finished while closed");
                controller.dispatch_alerts(mode);
                controller.persist_snapshot();
            }
        }
        if controller.engine.is_running() {
            controller.arm_interval();
        }
        controller
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.engine.status(self.now())
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// What happened to the saved session when this controller was loaded.
    pub fn recovery(&self) -> &Recovery {
        &self.recovery
    }

    pub fn interval_armed(&self) -> bool {
        self.interval.is_armed()
    }

    pub fn translate(&self, key: MessageKey) -> &'static str {
        translate(key, self.locale)
    }

    /// Label for the play/pause control: what `toggle()` would do next.
    pub fn toggle_label(&self) -> &'static str {
        let key = if self.engine.is_running() {
            MessageKey::Pause
        } else {
            MessageKey::Play
        };
        self.translate(key)
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Start the current mode. `None` when already running or the mode has
    /// no time left.
    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start(self.now())?;
        self.arm_interval();
        self.persist_snapshot();
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause(self.now())?;
        self.interval.clear();
        self.persist_snapshot();
        Some(event)
    }

    /// The play/pause button.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.engine.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Drive the countdown. Call once per second while the interval is armed.
    pub fn tick(&mut self) -> TickReport {
        let now = self.now();
        match self.engine.tick(now) {
            TickOutcome::Idle => TickReport::Idle,
            TickOutcome::Counting { time_left, total } => TickReport::Counting { time_left, total },
            TickOutcome::Expired { mode } => {
                self.interval.clear();
                info!(%mode, "session complete");
                let completed = Event::TimerCompleted {
                    mode,
                    at: self.caps.clock.now(),
                };
                let alerts = self.dispatch_alerts(mode);
                let advanced = self.engine.advance(now);
                self.after_advance();
                TickReport::Completed {
                    completed,
                    advanced,
                    alerts,
                }
            }
        }
    }

    /// Jump to the next mode in the cycle without alerts.
    pub fn skip(&mut self) -> Event {
        self.interval.clear();
        let event = self.engine.advance(self.now());
        self.after_advance();
        event
    }

    pub fn switch_mode(&mut self, target: Mode) -> Event {
        self.interval.clear();
        let event = self.engine.switch_mode(target, self.now());
        self.persist_snapshot();
        event
    }

    /// Refill the current mode, stop, and forget the saved session.
    pub fn reset(&mut self) -> Event {
        self.interval.clear();
        let event = self.engine.reset(self.now());
        if let Err(e) = self.store.clear_snapshot() {
            write_failed("timer snapshot", &e);
        }
        event
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Set a mode's duration in minutes, rescaling it if it is in flight.
    pub fn set_minutes(&mut self, mode: Mode, minutes: u32) -> Result<Event, ValidationError> {
        if minutes == 0 {
            return Err(non_positive(SettingKey::for_mode(mode)));
        }
        self.settings.set_minutes(mode, minutes);
        let event = self
            .engine
            .change_duration(mode, minutes_to_secs(minutes), self.now());
        self.persist_settings();
        self.persist_snapshot();
        Ok(event)
    }

    pub fn set_long_break_interval(&mut self, interval: u32) -> Result<Event, ValidationError> {
        if interval == 0 {
            return Err(non_positive(SettingKey::Interval));
        }
        self.settings.long_break_interval = interval;
        let event = self.engine.change_long_break_interval(interval, self.now());
        self.persist_settings();
        self.persist_snapshot();
        Ok(event)
    }

    pub fn set_auto_start_breaks(&mut self, enabled: bool) {
        self.settings.auto_start_breaks = enabled;
        self.engine.set_auto_start(self.settings.auto_start());
        self.persist_settings();
    }

    pub fn set_auto_start_focus(&mut self, enabled: bool) {
        self.settings.auto_start_focus = enabled;
        self.engine.set_auto_start(self.settings.auto_start());
        self.persist_settings();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        self.persist_settings();
    }

    /// Enabling asks for permission first; the flag only sticks if granted.
    /// Returns the resulting value.
    pub async fn set_popup_enabled(&mut self, enabled: bool) -> bool {
        let granted = if enabled {
            let permission = self.caps.permission.request().await;
            debug!(?permission, "notification permission requested");
            permission.is_granted()
        } else {
            false
        };
        self.settings.popup_enabled = granted;
        self.persist_settings();
        granted
    }

    /// Set any setting from text, as typed by the user. Returns the stored
    /// value, which for `popup` may differ from the request.
    pub async fn set_setting(
        &mut self,
        key: SettingKey,
        raw: &str,
    ) -> Result<String, ValidationError> {
        match key {
            SettingKey::Focus | SettingKey::Break | SettingKey::LongBreak => {
                let minutes = settings::parse_positive(key, raw)?;
                if let Some(mode) = key.duration_mode() {
                    self.set_minutes(mode, minutes)?;
                }
            }
            SettingKey::Interval => {
                self.set_long_break_interval(settings::parse_positive(key, raw)?)?;
            }
            SettingKey::AutoStartBreaks => self.set_auto_start_breaks(settings::parse_flag(key, raw)?),
            SettingKey::AutoStartFocus => self.set_auto_start_focus(settings::parse_flag(key, raw)?),
            SettingKey::Sound => self.set_sound_enabled(settings::parse_flag(key, raw)?),
            SettingKey::Popup => {
                self.set_popup_enabled(settings::parse_flag(key, raw)?).await;
            }
        }
        Ok(self.settings.get(key))
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn create_task(&mut self, text: &str) -> Result<usize, ValidationError> {
        let index = self.tasks.create(text)?;
        self.persist_tasks();
        Ok(index)
    }

    pub fn edit_task(&mut self, index: usize, text: &str) -> Result<(), ValidationError> {
        self.tasks.edit(index, text)?;
        self.persist_tasks();
        Ok(())
    }

    pub fn toggle_task(&mut self, index: usize) -> Result<bool, ValidationError> {
        let completed = self.tasks.toggle_complete(index)?;
        self.persist_tasks();
        Ok(completed)
    }

    pub fn reorder_tasks(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        self.tasks.reorder(from, to)?;
        self.persist_tasks();
        Ok(())
    }

    /// Delete one task after the user confirms. `Ok(None)` when declined.
    pub async fn delete_task(&mut self, index: usize) -> Result<Option<Task>, ValidationError> {
        let Some(task) = self.tasks.get(index) else {
            return Err(ValidationError::OutOfBounds {
                collection: "tasks".into(),
                index,
                len: self.tasks.len(),
            });
        };
        let message = translate_with(
            MessageKey::ConfirmDeleteSingle,
            self.locale,
            &[("task", task.text.as_str())],
        );
        if !self.ask(MessageKey::Delete, &message).await {
            return Ok(None);
        }
        let removed = self.tasks.delete(index)?;
        self.persist_tasks();
        Ok(Some(removed))
    }

    /// Delete every task after the user confirms. Returns how many were
    /// removed; an empty list never asks.
    pub async fn delete_all_tasks(&mut self) -> usize {
        if self.tasks.is_empty() {
            return 0;
        }
        let message = translate(MessageKey::ConfirmDeleteAll, self.locale);
        if !self.ask(MessageKey::DeleteAllTasks, message).await {
            return 0;
        }
        let removed = self.tasks.delete_all();
        self.persist_tasks();
        removed
    }

    /// Delete completed tasks after the user confirms. Never asks when none
    /// are completed.
    pub async fn delete_completed_tasks(&mut self) -> usize {
        if self.tasks.completed_count() == 0 {
            return 0;
        }
        let message = translate(MessageKey::ConfirmDeleteCompleted, self.locale);
        if !self.ask(MessageKey::DeleteCompletedTasks, message).await {
            return 0;
        }
        let removed = self.tasks.delete_completed();
        self.persist_tasks();
        removed
    }

    // ── Language ─────────────────────────────────────────────────────

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        if let Err(e) = self.store.save_locale(locale) {
            write_failed("language", &e);
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn now(&self) -> i64 {
        self.caps.clock.now_ms()
    }

    fn arm_interval(&mut self) {
        self.interval.arm(self.caps.scheduler.as_mut());
    }

    /// The engine has already moved on. Re-arm if it auto-started.
    fn after_advance(&mut self) {
        if self.engine.is_running() {
            self.arm_interval();
        }
        self.persist_snapshot();
    }

    fn dispatch_alerts(&self, finished: Mode) -> Vec<NotificationKind> {
        notify::dispatch(
            &self.settings,
            self.caps.permission.status(),
            self.caps.notifier.as_ref(),
            finished,
            self.locale,
        )
    }

    async fn ask(&self, title: MessageKey, message: &str) -> bool {
        let title = translate(title, self.locale);
        let confirmed = self.caps.confirm.confirm(title, message).await;
        debug!(title, confirmed, "confirmation answered");
        confirmed
    }

    fn persist_snapshot(&mut self) {
        let snapshot = self.engine.snapshot(self.now());
        if let Err(e) = self.store.save_snapshot(&snapshot) {
            write_failed("timer snapshot", &e);
        }
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.store.save_settings(&self.settings) {
            write_failed("settings", &e);
        }
    }

    fn persist_tasks(&mut self) {
        if let Err(e) = self.store.save_tasks(&self.tasks) {
            write_failed("tasks", &e);
        }
    }
}

fn write_failed(record: &str, error: &StorageError) {
    warn!(record, %error, "failed to persist");
}

fn non_positive(key: SettingKey) -> ValidationError {
    ValidationError::InvalidValue {
        field: key.as_str().to_string(),
        message: "must be at least 1".into(),
    }
}
