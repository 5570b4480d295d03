//! Board-wide settings written by administrators.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Per-participant selection cap when none is stored.
pub const DEFAULT_MAX_SELECTIONS: u32 = 10;

/// Largest cap an administrator may configure.
pub const MAX_SELECTIONS_LIMIT: u32 = 100;

/// Check an administrator-supplied selection cap.
pub fn validate_max_selections(value: i64) -> Result<u32> {
    if (1..=MAX_SELECTIONS_LIMIT as i64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(CoreError::InvalidMaxSelections(value))
    }
}

/// A quarter of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Store key of this quarter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quarter::Q1 => "q1",
            Quarter::Q2 => "q2",
            Quarter::Q3 => "q3",
            Quarter::Q4 => "q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quarter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "q1" | "1" => Ok(Quarter::Q1),
            "q2" | "2" => Ok(Quarter::Q2),
            "q3" | "3" => Ok(Quarter::Q3),
            "q4" | "4" => Ok(Quarter::Q4),
            other => Err(format!("unknown quarter: {}", other)),
        }
    }
}

/// One optional string per quarter (winner names or scores).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuarterValues {
    values: [Option<String>; 4],
}

impl QuarterValues {
    pub fn from_value(value: Option<&Value>) -> Self {
        let mut out = QuarterValues::default();
        if let Some(Value::Object(entries)) = value {
            for quarter in Quarter::ALL {
                if let Some(text) = entries.get(quarter.as_str()).and_then(Value::as_str) {
                    out.set(quarter, Some(text.to_string()));
                }
            }
        }
        out
    }

    pub fn get(&self, quarter: Quarter) -> Option<&str> {
        self.values[quarter as usize].as_deref()
    }

    pub fn set(&mut self, quarter: Quarter, value: Option<String>) {
        self.values[quarter as usize] = value.filter(|v| !v.is_empty());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quarter, Option<&str>)> {
        Quarter::ALL.into_iter().map(move |q| (q, self.get(q)))
    }
}

/// Everything stored under `settings`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub max_selections: Option<u32>,
    pub board_locked: bool,
    pub winners: QuarterValues,
    pub scores: QuarterValues,
}

impl Settings {
    /// Decode the `settings` subtree. Missing or malformed keys read as unset.
    pub fn from_value(value: &Value) -> Settings {
        Settings {
            max_selections: value
                .get("maxSelections")
                .and_then(Value::as_i64)
                .and_then(|n| validate_max_selections(n).ok()),
            board_locked: value
                .get("boardLocked")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            winners: QuarterValues::from_value(value.get("winners")),
            scores: QuarterValues::from_value(value.get("scores")),
        }
    }

    /// The cap in force: the stored value, else `default`.
    pub fn max_allowed(&self, default: u32) -> u32 {
        self.max_selections.unwrap_or(default)
    }

    /// Winner for display, `TBD` until one is recorded.
    pub fn winner_label(&self, quarter: Quarter) -> &str {
        self.winners.get(quarter).unwrap_or("TBD")
    }
}
