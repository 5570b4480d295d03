//! Settings and lock policy consulted before every claim or commit.

use crate::error::{BoardError, Result};
use crate::session::Role;
use serde_json::Value;
use squares_core::{Quarter, Settings};

#[derive(Clone, Debug)]
pub struct SettingsGate {
    settings: Settings,
    default_max: u32,
}

impl SettingsGate {
    pub fn new(default_max: u32) -> Self {
        Self {
            settings: Settings::default(),
            default_max,
        }
    }

    /// Replace the settings with a pushed `settings` subtree.
    pub fn apply(&mut self, value: &Value) {
        self.settings = Settings::from_value(value);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn board_locked(&self) -> bool {
        self.settings.board_locked
    }

    /// The per-participant cap in force.
    pub fn max_allowed(&self) -> u32 {
        self.settings.max_allowed(self.default_max)
    }

    pub fn winner(&self, quarter: Quarter) -> Option<&str> {
        self.settings.winners.get(quarter)
    }

    pub fn score(&self, quarter: Quarter) -> Option<&str> {
        self.settings.scores.get(quarter)
    }

    /// Participants may not write while the board is locked. Admins always may.
    pub fn check_writable(&self, role: Role) -> Result<()> {
        if self.board_locked() && !role.is_admin() {
            return Err(BoardError::BoardLocked);
        }
        Ok(())
    }

    /// Adding one more pending cell needs `saved + pending < max`.
    pub fn check_room(&self, saved: usize, pending: usize) -> Result<()> {
        let max = self.max_allowed();
        if saved + pending >= max as usize {
            return Err(BoardError::SelectionLimitReached(max));
        }
        Ok(())
    }

    /// Cells this participant may still pick.
    pub fn selections_left(&self, saved: usize, pending: usize) -> usize {
        (self.max_allowed() as usize).saturating_sub(saved + pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locked_board_blocks_participants_only() {
        let mut gate = SettingsGate::new(10);
        assert!(gate.check_writable(Role::Participant).is_ok());

        gate.apply(&json!({ "boardLocked": true }));
        assert_eq!(
            gate.check_writable(Role::Participant),
            Err(BoardError::BoardLocked)
        );
        assert!(gate.check_writable(Role::Admin).is_ok());
    }

    #[test]
    fn test_room_uses_stored_cap() {
        let mut gate = SettingsGate::new(10);
        gate.apply(&json!({ "maxSelections": 3 }));

        assert!(gate.check_room(1, 1).is_ok());
        assert_eq!(
            gate.check_room(2, 1),
            Err(BoardError::SelectionLimitReached(3))
        );
        assert_eq!(gate.selections_left(2, 1), 0);
        assert_eq!(gate.selections_left(5, 0), 0);
    }

    #[test]
    fn test_default_cap_when_unset() {
        let gate = SettingsGate::new(10);
        assert_eq!(gate.max_allowed(), 10);
        assert_eq!(gate.selections_left(4, 2), 4);
    }
}
