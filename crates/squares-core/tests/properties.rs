//! Property-based tests for board values.
//!
//! - Every generated axis is a permutation of 0..=9
//! - Cell keys survive formatting and parsing
//! - Board decoding never keeps an entry it cannot read
//! - Formatted names are capitalized and capped

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Map, Value};
use squares_core::{
    format_name, Axis, AxisGenerator, Board, CellKey, MAX_NAME_LENGTH,
};

fn cell_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[A-Za-z]{1,10}".prop_map(Value::String),
        ("[A-Za-z]{1,10}", "#[0-9a-f]{6}").prop_map(|(name, color)| json!({
            "name": name,
            "color": color,
        })),
        any::<i64>().prop_map(Value::from),
        Just(json!({ "color": "#ffffff" })),
        Just(Value::Bool(true)),
    ]
}

proptest! {
    #[test]
    fn axes_are_always_permutations(seed in any::<u64>()) {
        let mut generator = AxisGenerator::with_rng(StdRng::seed_from_u64(seed));
        let axes = generator.generate();

        for axis in [axes.top.unwrap(), axes.left.unwrap()] {
            let mut digits = axis.digits().to_vec();
            digits.sort_unstable();
            prop_assert_eq!(digits, Axis::canonical().digits().to_vec());
        }
    }

    #[test]
    fn cell_keys_round_trip(row in 0u8..10, col in 0u8..10) {
        let key = CellKey::new(row, col).unwrap();
        prop_assert_eq!(key.to_string().parse::<CellKey>().unwrap(), key);
    }

    #[test]
    fn out_of_range_keys_rejected(row in 10u8..=255, col in 0u8..10) {
        prop_assert!(CellKey::new(row, col).is_err());
        prop_assert!(CellKey::new(col, row).is_err());
    }

    #[test]
    fn decode_accounts_for_every_entry(
        entries in prop::collection::btree_map((0u8..10, 0u8..10), cell_value_strategy(), 0..30)
    ) {
        let raw: Map<String, Value> = entries
            .iter()
            .map(|((r, c), v)| (format!("{}-{}", r, c), v.clone()))
            .collect();
        let (board, dropped) = Board::decode(&Value::Object(raw));

        let readable = entries
            .values()
            .filter(|v| v.is_string() || v.get("name").map_or(false, Value::is_string))
            .count();
        prop_assert_eq!(board.filled_count(), readable);
        prop_assert_eq!(board.filled_count() + dropped, entries.len());
    }

    #[test]
    fn formatted_names_are_capped(input in "[a-z]{1,30}") {
        let name = format_name(&input).unwrap();
        prop_assert!(name.chars().count() <= MAX_NAME_LENGTH);
        prop_assert!(name.chars().next().unwrap().is_uppercase());
    }
}
