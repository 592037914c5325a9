use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Session type. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Focus,
    Break,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::Break, Mode::LongBreak];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Break => "break",
            Mode::LongBreak => "long_break",
        }
    }

    pub fn is_break(self) -> bool {
        matches!(self, Mode::Break | Mode::LongBreak)
    }

    fn index(self) -> usize {
        match self {
            Mode::Focus => 0,
            Mode::Break => 1,
            Mode::LongBreak => 2,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "focus" => Ok(Mode::Focus),
            "break" | "short_break" => Ok(Mode::Break),
            "long_break" | "longbreak" => Ok(Mode::LongBreak),
            _ => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("expected focus, break or long-break, got '{s}'"),
            }),
        }
    }
}

/// One value per mode, tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerMode<T> {
    values: [T; 3],
}

impl<T: Copy> PerMode<T> {
    pub fn new(focus: T, brk: T, long_break: T) -> Self {
        Self {
            values: [focus, brk, long_break],
        }
    }

    pub fn get(&self, mode: Mode) -> T {
        self.values[mode.index()]
    }

    pub fn set(&mut self, mode: Mode, value: T) {
        self.values[mode.index()] = value;
    }
}
