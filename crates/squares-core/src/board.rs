//! Read-only snapshot of the claimed cells.

use crate::cell::{Cell, CellKey, CELL_COUNT};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Mapping from cell key to owner record, as last pushed by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: BTreeMap<CellKey, Cell>,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the `board` subtree, dropping entries that cannot be read.
    ///
    /// Returns the board together with the number of dropped entries.
    pub fn decode(value: &Value) -> (Board, usize) {
        let mut board = Board::new();
        let mut dropped = 0;

        if let Value::Object(entries) = value {
            for (raw_key, raw_cell) in entries {
                match (raw_key.parse::<CellKey>(), Cell::from_value(raw_cell)) {
                    (Ok(key), Some(cell)) => {
                        board.cells.insert(key, cell);
                    }
                    _ => dropped += 1,
                }
            }
        }

        (board, dropped)
    }

    /// Decode a `board` subtree, discarding unreadable entries.
    pub fn from_value(value: &Value) -> Board {
        Self::decode(value).0
    }

    /// Encode back into the structured store form.
    pub fn to_value(&self) -> Value {
        let entries: Map<String, Value> = self
            .cells
            .iter()
            .map(|(key, cell)| (key.to_string(), cell.to_value()))
            .collect();
        Value::Object(entries)
    }

    /// Set the record for `key`, returning the previous one.
    pub fn insert(&mut self, key: CellKey, cell: Cell) -> Option<Cell> {
        self.cells.insert(key, cell)
    }

    /// Get the record at `key`.
    pub fn get(&self, key: &CellKey) -> Option<&Cell> {
        self.cells.get(key)
    }

    /// Get the owner name at `key`.
    pub fn owner(&self, key: &CellKey) -> Option<&str> {
        self.cells.get(key).map(|cell| cell.name.as_str())
    }

    /// Whether nobody owns `key`.
    pub fn is_open(&self, key: &CellKey) -> bool {
        !self.cells.contains_key(key)
    }

    /// Iterate owned cells in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &Cell)> {
        self.cells.iter()
    }

    /// Number of owned cells.
    pub fn filled_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether all 100 cells are owned.
    pub fn is_full(&self) -> bool {
        self.cells.len() == CELL_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells owned by `name`.
    pub fn owned_by(&self, name: &str) -> usize {
        self.cells.values().filter(|cell| cell.is_owned_by(name)).count()
    }

    /// First cell owned by `name`, used to recover a returning participant's colors.
    pub fn find_by_owner(&self, name: &str) -> Option<&Cell> {
        self.cells.values().find(|cell| cell.is_owned_by(name))
    }

    /// Owners and their cell counts, most cells first, ties by name.
    pub fn name_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for cell in self.cells.values() {
            *counts.entry(cell.name.as_str()).or_default() += 1;
        }

        let mut entries: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{DEFAULT_COLOR, DEFAULT_TEXT_COLOR};
    use serde_json::json;

    fn key(s: &str) -> CellKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_decode_mixed_payload() {
        let value = json!({
            "0-0": "Alice",
            "0-1": { "name": "Bob", "color": "#123456", "textColor": "#ffffff" },
            "0-2": 17,
            "0-3": { "color": "#000000" },
            "bogus": "Carl",
        });

        let (board, dropped) = Board::decode(&value);
        assert_eq!(board.filled_count(), 2);
        assert_eq!(dropped, 3);

        let alice = board.get(&key("0-0")).unwrap();
        assert_eq!(alice.color, DEFAULT_COLOR);
        assert_eq!(alice.text_color, DEFAULT_TEXT_COLOR);
        assert_eq!(board.owner(&key("0-1")), Some("Bob"));
    }

    #[test]
    fn test_null_is_empty_board() {
        let board = Board::from_value(&Value::Null);
        assert!(board.is_empty());
        assert!(!board.is_full());
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for key in CellKey::all() {
            board.insert(key, Cell::new("Alice", DEFAULT_COLOR, DEFAULT_TEXT_COLOR));
        }
        assert!(board.is_full());
        assert_eq!(board.owned_by("Alice"), 100);
    }

    #[test]
    fn test_name_counts_ordering() {
        let mut board = Board::new();
        board.insert(key("0-0"), Cell::new("Zed", "a", "b"));
        board.insert(key("0-1"), Cell::new("Zed", "a", "b"));
        board.insert(key("0-2"), Cell::new("Bea", "a", "b"));
        board.insert(key("0-3"), Cell::new("Amy", "a", "b"));

        assert_eq!(
            board.name_counts(),
            vec![
                ("Zed".to_string(), 2),
                ("Amy".to_string(), 1),
                ("Bea".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_to_value_decodes_to_same_board() {
        let mut board = Board::new();
        board.insert(key("4-4"), Cell::new("Dee", "#010101", "#020202"));
        assert_eq!(Board::from_value(&board.to_value()), board);
    }
}
