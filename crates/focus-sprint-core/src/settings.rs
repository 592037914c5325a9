//! User settings.
//!
//! Stored as one JSON record with the field names `focus`, `break`,
//! `longBreak`, `interval`, `autoStartBreaks`, `autoStartFocus`, `sound` and
//! `popup`. Loading never fails: any field that is missing, not a number, or
//! not positive falls back to its default. Numeric strings are accepted since
//! older records stored raw form input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::timer::{AutoStart, Mode, PerMode};

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    #[serde(rename = "focus")]
    pub focus_minutes: u32,
    #[serde(rename = "break")]
    pub break_minutes: u32,
    #[serde(rename = "longBreak")]
    pub long_break_minutes: u32,
    #[serde(rename = "interval")]
    pub long_break_interval: u32,
    #[serde(rename = "autoStartBreaks")]
    pub auto_start_breaks: bool,
    #[serde(rename = "autoStartFocus")]
    pub auto_start_focus: bool,
    #[serde(rename = "sound")]
    pub sound_enabled: bool,
    #[serde(rename = "popup")]
    pub popup_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
            auto_start_breaks: false,
            auto_start_focus: false,
            sound_enabled: false,
            popup_enabled: false,
        }
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Settings::from_value(&value))
    }
}

impl Settings {
    /// Build from an arbitrary JSON value, field by field.
    pub fn from_value(value: &Value) -> Self {
        let d = Settings::default();
        let field = |key: &str| value.get(key);
        Self {
            focus_minutes: field("focus").and_then(positive).unwrap_or(d.focus_minutes),
            break_minutes: field("break").and_then(positive).unwrap_or(d.break_minutes),
            long_break_minutes: field("longBreak")
                .and_then(positive)
                .unwrap_or(d.long_break_minutes),
            long_break_interval: field("interval")
                .and_then(positive)
                .unwrap_or(d.long_break_interval),
            auto_start_breaks: field("autoStartBreaks")
                .and_then(flag)
                .unwrap_or(d.auto_start_breaks),
            auto_start_focus: field("autoStartFocus")
                .and_then(flag)
                .unwrap_or(d.auto_start_focus),
            sound_enabled: field("sound").and_then(flag).unwrap_or(d.sound_enabled),
            popup_enabled: field("popup").and_then(flag).unwrap_or(d.popup_enabled),
        }
    }

    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus_minutes,
            Mode::Break => self.break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }

    pub fn set_minutes(&mut self, mode: Mode, minutes: u32) {
        match mode {
            Mode::Focus => self.focus_minutes = minutes,
            Mode::Break => self.break_minutes = minutes,
            Mode::LongBreak => self.long_break_minutes = minutes,
        }
    }

    /// Target durations in seconds.
    pub fn durations(&self) -> PerMode<i64> {
        PerMode::new(
            minutes_to_secs(self.focus_minutes),
            minutes_to_secs(self.break_minutes),
            minutes_to_secs(self.long_break_minutes),
        )
    }

    pub fn auto_start(&self) -> AutoStart {
        AutoStart {
            breaks: self.auto_start_breaks,
            focus: self.auto_start_focus,
        }
    }

    /// Get a setting as a string by key.
    pub fn get(&self, key: SettingKey) -> String {
        match serde_json::to_value(self) {
            Ok(json) => json
                .get(key.as_str())
                .map(|v| v.to_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        }
    }
}

pub fn minutes_to_secs(minutes: u32) -> i64 {
    i64::from(minutes) * 60
}

fn positive(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() && n >= 1.0 && n <= f64::from(u32::MAX) {
        Some(n.trunc() as u32)
    } else {
        None
    }
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse::<bool>().ok(),
        _ => None,
    }
}

/// Settings addressable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Focus,
    Break,
    LongBreak,
    Interval,
    AutoStartBreaks,
    AutoStartFocus,
    Sound,
    Popup,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::Focus,
        SettingKey::Break,
        SettingKey::LongBreak,
        SettingKey::Interval,
        SettingKey::AutoStartBreaks,
        SettingKey::AutoStartFocus,
        SettingKey::Sound,
        SettingKey::Popup,
    ];

    /// Field name in the persisted record.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Focus => "focus",
            SettingKey::Break => "break",
            SettingKey::LongBreak => "longBreak",
            SettingKey::Interval => "interval",
            SettingKey::AutoStartBreaks => "autoStartBreaks",
            SettingKey::AutoStartFocus => "autoStartFocus",
            SettingKey::Sound => "sound",
            SettingKey::Popup => "popup",
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Focus => SettingKey::Focus,
            Mode::Break => SettingKey::Break,
            Mode::LongBreak => SettingKey::LongBreak,
        }
    }

    /// The mode whose duration this key sets, if any.
    pub fn duration_mode(self) -> Option<Mode> {
        match self {
            SettingKey::Focus => Some(Mode::Focus),
            SettingKey::Break => Some(Mode::Break),
            SettingKey::LongBreak => Some(Mode::LongBreak),
            _ => None,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str().to_ascii_lowercase() == folded)
            .ok_or_else(|| ValidationError::UnknownSetting(s.to_string()))
    }
}

/// Parse a minutes/interval value from user input. Must be a positive integer.
pub fn parse_positive(field: SettingKey, raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 && n <= i64::from(u32::MAX) => Ok(n as u32),
        _ => Err(ValidationError::InvalidValue {
            field: field.as_str().to_string(),
            message: format!("expected a positive whole number, got '{raw}'"),
        }),
    }
}

pub fn parse_flag(field: SettingKey, raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ValidationError::InvalidValue {
            field: field.as_str().to_string(),
            message: format!("expected true or false, got '{raw}'"),
        }),
    }
}
