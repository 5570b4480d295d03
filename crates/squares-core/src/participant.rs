//! Participant identity.
//!
//! Identity is just a display name plus a color pair. Nothing is
//! authenticated: two sessions entering the same name are the same
//! participant for ownership checks.

use crate::board::Board;
use crate::cell::Cell;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Longest display name kept, in characters.
pub const MAX_NAME_LENGTH: usize = 10;

/// Trim, capitalize the first character and cap the length.
///
/// Returns `None` when nothing is left after trimming.
pub fn format_name(input: &str) -> Option<String> {
    let mut chars = input.trim().chars();
    let first = chars.next()?;
    let mut name: String = first.to_uppercase().collect();
    name.extend(chars.take(MAX_NAME_LENGTH - 1));
    Some(name)
}

/// A light `#rrggbb` fill color, each channel in `[120, 240)`.
pub fn random_color<R: Rng>(rng: &mut R) -> String {
    let r: u8 = rng.gen_range(120..240);
    let g: u8 = rng.gen_range(120..240);
    let b: u8 = rng.gen_range(120..240);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// The person acting in a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub color: String,
    pub text_color: String,
}

impl Participant {
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

    /// Take over the colors of a cell this participant already owns.
    ///
    /// Returns true when the colors changed.
    pub fn adopt_colors_from(&mut self, board: &Board) -> bool {
        match board.find_by_owner(&self.name) {
            Some(cell) if cell.color != self.color || cell.text_color != self.text_color => {
                self.color = cell.color.clone();
                self.text_color = cell.text_color.clone();
                true
            }
            _ => false,
        }
    }

    /// The record written when this participant claims a cell.
    pub fn to_cell(&self) -> Cell {
        Cell::new(&self.name, &self.color, &self.text_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellKey;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_format_name() {
        assert_eq!(format_name("  alice "), Some("Alice".to_string()));
        assert_eq!(format_name("bartholomew"), Some("Bartholome".to_string()));
        assert_eq!(format_name("éloise"), Some("Éloise".to_string()));
        assert_eq!(format_name("   "), None);
    }

    #[test]
    fn test_random_color_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let color = random_color(&mut rng);
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            for channel in [&color[1..3], &color[3..5], &color[5..7]] {
                let v = u8::from_str_radix(channel, 16).unwrap();
                assert!((120..240).contains(&v));
            }
        }
    }

    #[test]
    fn test_adopt_colors() {
        let mut board = Board::new();
        board.insert(
            CellKey::new(1, 1).unwrap(),
            Cell::new("Alice", "#aaaaaa", "#bbbbbb"),
        );

        let mut alice = Participant::new("Alice", "#000000", "#000000");
        assert!(alice.adopt_colors_from(&board));
        assert_eq!(alice.color, "#aaaaaa");
        assert!(!alice.adopt_colors_from(&board));

        let mut bob = Participant::new("Bob", "#000000", "#000000");
        assert!(!bob.adopt_colors_from(&board));
    }
}
