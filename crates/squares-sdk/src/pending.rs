//! Cells chosen in this session but not yet committed.

use squares_core::CellKey;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingSelections {
    keys: BTreeSet<CellKey>,
}

impl PendingSelections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.keys.contains(key)
    }

    pub fn insert(&mut self, key: CellKey) -> bool {
        self.keys.insert(key)
    }

    pub fn remove(&mut self, key: &CellKey) -> bool {
        self.keys.remove(key)
    }

    /// Drop the keys that made it into the store.
    pub fn remove_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a CellKey>) {
        for key in keys {
            self.keys.remove(key);
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellKey> {
        self.keys.iter()
    }

    pub fn to_vec(&self) -> Vec<CellKey> {
        self.keys.iter().copied().collect()
    }
}
