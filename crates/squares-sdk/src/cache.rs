//! Local mirror of the shared board, axes and lock flags.
//!
//! The cache is only ever written from store pushes. Claim attempts never
//! touch it, so a write the store rejects cannot leave a stale cell behind.

use serde_json::Value;
use crate::paths;
use squares_core::{Axes, Board, Cell, CellKey};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct BoardCache {
    board: Board,
    axes: Axes,
    locks: BTreeMap<String, bool>,
}

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the board with a pushed `board` subtree.
    pub fn apply_board(&mut self, value: &Value) {
        let (board, dropped) = Board::decode(value);
        if dropped > 0 {
            debug!(dropped, "ignored unreadable board entries");
        }
        self.board = board;
    }

    /// Replace the axes with a pushed `axes` subtree.
    pub fn apply_axes(&mut self, value: &Value) {
        self.axes = Axes::from_value(value);
    }

    /// Replace the lock flags with a pushed `locks` subtree.
    pub fn apply_locks(&mut self, value: &Value) {
        self.locks = value
            .as_object()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(segment, flag)| {
                        let name = paths::lock_owner(segment)?;
                        flag.as_bool().map(|f| (name, f))
                    })
                    .collect()
            })
            .unwrap_or_default();
    }

    /// Get the last pushed board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get the last pushed axes.
    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn cell(&self, key: &CellKey) -> Option<&Cell> {
        self.board.get(key)
    }

    /// Get the owner name at `key`.
    pub fn owner(&self, key: &CellKey) -> Option<&str> {
        self.board.owner(key)
    }

    /// Cells already committed by `name`.
    pub fn saved_count(&self, name: &str) -> usize {
        self.board.owned_by(name)
    }

    /// Whether `name` has locked in at least once.
    pub fn is_locked_in(&self, name: &str) -> bool {
        self.locks.get(name).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use squares_core::{DEFAULT_COLOR, DEFAULT_TEXT_COLOR};

    #[test]
    fn test_legacy_entry_normalized() {
        let mut cache = BoardCache::new();
        cache.apply_board(&json!({ "3-7": "Alice" }));

        let key = CellKey::new(3, 7).unwrap();
        assert_eq!(
            cache.cell(&key),
            Some(&Cell::new("Alice", DEFAULT_COLOR, DEFAULT_TEXT_COLOR))
        );
    }

    #[test]
    fn test_push_replaces_previous_board() {
        let mut cache = BoardCache::new();
        cache.apply_board(&json!({ "0-0": "Alice", "0-1": "Alice" }));
        assert_eq!(cache.saved_count("Alice"), 2);

        cache.apply_board(&Value::Null);
        assert_eq!(cache.saved_count("Alice"), 0);
        assert!(cache.board().is_empty());
    }

    #[test]
    fn test_locks() {
        let mut cache = BoardCache::new();
        cache.apply_locks(&json!({ "Alice": true, "Bob": "yes" }));
        assert!(cache.is_locked_in("Alice"));
        assert!(!cache.is_locked_in("Bob"));
        assert!(!cache.is_locked_in("Cara"));
    }

    #[test]
    fn test_locks_decode_encoded_names() {
        let mut cache = BoardCache::new();
        cache.apply_locks(&json!({ "A%2Fb": true }));
        assert!(cache.is_locked_in("A/b"));
        assert!(!cache.is_locked_in("A%2Fb"));
    }
}
