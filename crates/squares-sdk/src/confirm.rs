//! Interactive confirmation, supplied by the presentation layer.

use squares_core::CellKey;
use std::fmt;

/// Question put to the person at the keyboard before a destructive write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// An administrator is about to clear someone's cell.
    RemoveSelection { key: CellKey, owner: String },
    /// A participant is about to commit their pending cells.
    LockIn { count: usize },
    /// An administrator is about to wipe the board.
    ResetBoard,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::RemoveSelection { owner, .. } => write!(f, "Remove {} from this box?", owner),
            Prompt::LockIn { count } => write!(
                f,
                "Lock in {} selection{}? You will not be able to change them.",
                count,
                if *count == 1 { "" } else { "s" }
            ),
            Prompt::ResetBoard => {
                write!(f, "Reset the board, locks, and numbers? This cannot be undone.")
            }
        }
    }
}

/// Answers [`Prompt`]s.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &Prompt) -> bool;
}

impl<F> Confirmer for F
where
    F: Fn(&Prompt) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &Prompt) -> bool {
        self(prompt)
    }
}

/// Says yes to everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

impl Confirmer for AlwaysConfirm {
    fn confirm(&self, _prompt: &Prompt) -> bool {
        true
    }
}

/// Says no to everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverConfirm;

impl Confirmer for NeverConfirm {
    fn confirm(&self, _prompt: &Prompt) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text() {
        let prompt = Prompt::RemoveSelection {
            key: CellKey::new(0, 0).unwrap(),
            owner: "Alice".to_string(),
        };
        assert_eq!(prompt.to_string(), "Remove Alice from this box?");
        assert!(Prompt::LockIn { count: 1 }.to_string().starts_with("Lock in 1 selection?"));
    }

    #[test]
    fn test_closure_confirmer() {
        let only_lock_in = |prompt: &Prompt| matches!(prompt, Prompt::LockIn { .. });
        assert!(only_lock_in.confirm(&Prompt::LockIn { count: 2 }));
        assert!(!only_lock_in.confirm(&Prompt::ResetBoard));
        assert!(AlwaysConfirm.confirm(&Prompt::ResetBoard));
        assert!(!NeverConfirm.confirm(&Prompt::ResetBoard));
    }
}
