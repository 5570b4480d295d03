//! Row and column header digits.
//!
//! Each axis is a permutation of `0..=9`, generated once the board is full
//! and always replaced as a whole. A stored axis of any length other than
//! ten is treated as unset and rendered with placeholders.

use crate::cell::BOARD_SIZE;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label shown for every position of an unset axis.
pub const AXIS_PLACEHOLDER: &str = "?";

const AXIS_LEN: usize = BOARD_SIZE as usize;

/// One header sequence of ten digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis([u8; AXIS_LEN]);

impl Axis {
    /// The identity ordering `0, 1, ..., 9`.
    pub fn canonical() -> Self {
        let mut digits = [0u8; AXIS_LEN];
        for (i, d) in digits.iter_mut().enumerate() {
            *d = i as u8;
        }
        Axis(digits)
    }

    /// Read a stored axis. Wrong lengths and non-digit entries yield `None`.
    pub fn from_value(value: &Value) -> Option<Axis> {
        let items = value.as_array()?;
        if items.len() != AXIS_LEN {
            return None;
        }

        let mut digits = [0u8; AXIS_LEN];
        for (slot, item) in digits.iter_mut().zip(items) {
            let digit = item.as_u64().filter(|d| *d < AXIS_LEN as u64)?;
            *slot = digit as u8;
        }
        Some(Axis(digits))
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(|d| Value::from(*d)).collect())
    }

    pub fn digits(&self) -> &[u8; AXIS_LEN] {
        &self.0
    }

    /// True when every digit appears exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut sorted = self.0;
        sorted.sort_unstable();
        sorted == Axis::canonical().0
    }
}

/// Both header sequences as last seen in the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Axes {
    pub top: Option<Axis>,
    pub left: Option<Axis>,
}

impl Axes {
    /// Decode the `axes` subtree.
    pub fn from_value(value: &Value) -> Axes {
        Axes {
            top: value.get("top").and_then(Axis::from_value),
            left: value.get("left").and_then(Axis::from_value),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut entries = serde_json::Map::new();
        if let Some(top) = &self.top {
            entries.insert("top".to_string(), top.to_value());
        }
        if let Some(left) = &self.left {
            entries.insert("left".to_string(), left.to_value());
        }
        Value::Object(entries)
    }

    pub fn is_set(&self) -> bool {
        self.top.is_some() && self.left.is_some()
    }

    pub fn top_labels(&self) -> Vec<String> {
        labels(self.top.as_ref())
    }

    pub fn left_labels(&self) -> Vec<String> {
        labels(self.left.as_ref())
    }
}

fn labels(axis: Option<&Axis>) -> Vec<String> {
    match axis {
        Some(axis) => axis.digits().iter().map(|d| d.to_string()).collect(),
        None => vec![AXIS_PLACEHOLDER.to_string(); AXIS_LEN],
    }
}

/// Produces uniformly shuffled axes.
pub struct AxisGenerator<R = StdRng> {
    rng: R,
}

impl AxisGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator, for tests and replayable demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> AxisGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// One Fisher-Yates shuffle of the canonical digits.
    pub fn permutation(&mut self) -> Axis {
        let mut digits = Axis::canonical().0;
        digits.shuffle(&mut self.rng);
        Axis(digits)
    }

    /// Two independent permutations.
    pub fn generate(&mut self) -> Axes {
        Axes {
            top: Some(self.permutation()),
            left: Some(self.permutation()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrong_length_is_unset() {
        assert!(Axis::from_value(&json!([1, 2, 3])).is_none());
        assert!(Axis::from_value(&json!([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0])).is_none());
        assert!(Axis::from_value(&json!([0, 1, 2, 3, 4, 5, 6, 7, 8, 10])).is_none());
        assert!(Axis::from_value(&json!("0123456789")).is_none());
    }

    #[test]
    fn test_placeholder_labels() {
        let axes = Axes::from_value(&json!({ "top": [9, 8, 7, 6, 5, 4, 3, 2, 1, 0], "left": [1] }));
        assert_eq!(axes.top_labels()[0], "9");
        assert_eq!(axes.left_labels(), vec!["?"; 10]);
        assert!(!axes.is_set());
    }

    #[test]
    fn test_generated_axes_are_permutations() {
        let mut generator = AxisGenerator::seeded(7);
        for _ in 0..50 {
            let axes = generator.generate();
            assert!(axes.top.unwrap().is_permutation());
            assert!(axes.left.unwrap().is_permutation());
        }
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let a = AxisGenerator::seeded(42).generate();
        let b = AxisGenerator::seeded(42).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn test_axes_value_round_trip() {
        let axes = AxisGenerator::seeded(3).generate();
        assert_eq!(Axes::from_value(&axes.to_value()), axes);
    }
}
