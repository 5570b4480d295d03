//! Cells of the 10x10 board.
//!
//! A cell is addressed by a [`CellKey`] and serialized under the composite
//! key `"<row>-<col>"`. An owned cell carries a [`Cell`] record; an open cell
//! has no entry at all.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: u8 = 10;

/// Number of cells on a full board.
pub const CELL_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Fill color used when a stored cell carries none.
pub const DEFAULT_COLOR: &str = "#86efac";

/// Text color used when a stored cell carries none.
pub const DEFAULT_TEXT_COLOR: &str = "#0f172a";

/// Address of one square, row and column each in `0..10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    row: u8,
    col: u8,
}

impl CellKey {
    /// Create a key, rejecting coordinates outside the board.
    pub fn new(row: u8, col: u8) -> Result<Self> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(CoreError::CellOutOfRange { row, col });
        }
        Ok(Self { row, col })
    }

    /// Get the row index.
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Get the column index.
    pub fn col(&self) -> u8 {
        self.col
    }

    /// Every key on the board in row-major order.
    pub fn all() -> impl Iterator<Item = CellKey> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| CellKey { row, col }))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidCellKey(s.to_string());
        let (row, col) = s.split_once('-').ok_or_else(invalid)?;
        let row: u8 = row.parse().map_err(|_| invalid())?;
        let col: u8 = col.parse().map_err(|_| invalid())?;
        CellKey::new(row, col)
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ownership record of a claimed cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub name: String,
    pub color: String,
    #[serde(rename = "textColor")]
    pub text_color: String,
}

impl Cell {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        text_color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            text_color: text_color.into(),
        }
    }

    /// Normalize a stored cell value.
    ///
    /// Accepts the legacy bare-name form (`"Alice"`) and the structured
    /// `{name, color, textColor}` form. Missing or empty colors fall back to
    /// the defaults. Anything else yields `None`.
    pub fn from_value(value: &Value) -> Option<Cell> {
        match value {
            Value::String(name) => Some(Cell::new(name.as_str(), DEFAULT_COLOR, DEFAULT_TEXT_COLOR)),
            Value::Object(fields) => {
                let name = fields.get("name")?.as_str()?;
                let color = non_empty_str(fields.get("color")).unwrap_or(DEFAULT_COLOR);
                let text_color =
                    non_empty_str(fields.get("textColor")).unwrap_or(DEFAULT_TEXT_COLOR);
                Some(Cell::new(name, color, text_color))
            }
            _ => None,
        }
    }

    /// Structured form written to the store.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "color": self.color,
            "textColor": self.text_color,
        })
    }

    /// Whether `name` holds this cell.
    pub fn is_owned_by(&self, name: &str) -> bool {
        self.name == name
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_round_trip() {
        let key = CellKey::new(2, 3).unwrap();
        assert_eq!(key.to_string(), "2-3");
        assert_eq!("2-3".parse::<CellKey>().unwrap(), key);
    }

    #[test]
    fn test_key_rejects_garbage() {
        assert!("10-0".parse::<CellKey>().is_err());
        assert!("3".parse::<CellKey>().is_err());
        assert!("a-b".parse::<CellKey>().is_err());
        assert!(CellKey::new(0, 10).is_err());
    }

    #[test]
    fn test_all_keys() {
        let keys: Vec<_> = CellKey::all().collect();
        assert_eq!(keys.len(), CELL_COUNT);
        assert_eq!(keys[0].to_string(), "0-0");
        assert_eq!(keys[99].to_string(), "9-9");
    }

    #[test]
    fn test_legacy_string_is_normalized() {
        let cell = Cell::from_value(&json!("Alice")).unwrap();
        assert_eq!(cell, Cell::new("Alice", DEFAULT_COLOR, DEFAULT_TEXT_COLOR));
    }

    #[test]
    fn test_structured_cell_fills_missing_colors() {
        let cell = Cell::from_value(&json!({ "name": "Bob", "color": "#ff0000" })).unwrap();
        assert_eq!(cell.color, "#ff0000");
        assert_eq!(cell.text_color, DEFAULT_TEXT_COLOR);

        let cell = Cell::from_value(&json!({ "name": "Bob", "color": "", "textColor": "#fff" }))
            .unwrap();
        assert_eq!(cell.color, DEFAULT_COLOR);
        assert_eq!(cell.text_color, "#fff");
    }

    #[test]
    fn test_unrecognized_values_are_dropped() {
        assert!(Cell::from_value(&json!(42)).is_none());
        assert!(Cell::from_value(&json!(true)).is_none());
        assert!(Cell::from_value(&json!({ "color": "#fff" })).is_none());
        assert!(Cell::from_value(&Value::Null).is_none());
    }

    #[test]
    fn test_to_value_uses_store_field_names() {
        let value = Cell::new("Cara", "#111111", "#222222").to_value();
        assert_eq!(value["textColor"], "#222222");
        assert_eq!(Cell::from_value(&value).unwrap().name, "Cara");
    }
}
