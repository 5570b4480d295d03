//! Administrator operations.
//!
//! Settings writes are unconditional replacements: administrators are the
//! only writers of these keys.

use crate::confirm::Prompt;
use crate::error::{BoardError, Result};
use crate::paths;
use crate::session::{Session, SessionEvent};
use serde_json::Value;
use squares_core::{validate_max_selections, Axes, Quarter};
use squares_store::RemoteStore;
use tracing::{info, warn};

/// Result of [`Session::reset_board`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    Cancelled,
}

impl<S: RemoteStore> Session<S> {
    fn require_admin(&self) -> Result<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(BoardError::NotAdmin)
        }
    }

    /// Draw fresh axes for a full board and replace both sequences.
    ///
    /// Nothing is written unless all 100 cells are owned.
    pub async fn generate_axes(&mut self) -> Result<Axes> {
        self.require_admin()?;

        let filled = self.cache.board().filled_count();
        if !self.cache.board().is_full() {
            return Err(BoardError::BoardNotFull { filled });
        }

        let axes = self.axis_generator.generate();
        self.store.set(&paths::axes(), axes.to_value()).await?;
        info!(top = ?axes.top, left = ?axes.left, "axes generated");
        Ok(axes)
    }

    /// Wipe cells, lock flags, axes and winners. Scores survive.
    pub async fn reset_board(&mut self) -> Result<ResetOutcome> {
        self.require_admin()?;
        if !self.confirmer.confirm(&Prompt::ResetBoard) {
            return Ok(ResetOutcome::Cancelled);
        }

        for path in [paths::board(), paths::locks(), paths::axes(), paths::winners()] {
            self.store.set(&path, Value::Null).await.map_err(|err| {
                warn!(%path, error = %err, "reset interrupted");
                err
            })?;
        }

        self.pending.clear();
        info!("board reset");
        self.emit(SessionEvent::BoardReset);
        self.emit(SessionEvent::PendingChanged { pending: 0 });
        Ok(ResetOutcome::Reset)
    }

    pub async fn set_board_locked(&mut self, locked: bool) -> Result<()> {
        self.require_admin()?;
        self.store
            .set(&paths::board_locked(), Value::Bool(locked))
            .await?;
        info!(locked, "board lock changed");
        Ok(())
    }

    /// Flip the lock flag as last seen by this session. Returns the new value.
    pub async fn toggle_board_lock(&mut self) -> Result<bool> {
        let locked = !self.gate.board_locked();
        self.set_board_locked(locked).await?;
        Ok(locked)
    }

    pub async fn set_max_selections(&mut self, value: i64) -> Result<u32> {
        self.require_admin()?;
        let max = validate_max_selections(value)?;
        self.store
            .set(&paths::max_selections(), Value::from(max))
            .await?;
        info!(max, "max selections changed");
        Ok(max)
    }

    /// Record a quarter winner. An empty name clears it.
    pub async fn set_winner(&mut self, quarter: Quarter, name: &str) -> Result<()> {
        self.require_admin()?;
        self.store
            .set(&paths::winner(quarter), optional_text(name))
            .await?;
        Ok(())
    }

    /// Record a quarter score. An empty score clears it.
    pub async fn set_score(&mut self, quarter: Quarter, score: &str) -> Result<()> {
        self.require_admin()?;
        self.store
            .set(&paths::score(quarter), optional_text(score))
            .await?;
        Ok(())
    }
}

fn optional_text(text: &str) -> Value {
    let text = text.trim();
    if text.is_empty() {
        Value::Null
    } else {
        Value::String(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::confirm::NeverConfirm;
    use crate::session::Role;
    use serde_json::json;
    use squares_store::MemoryStore;
    use std::sync::Arc;

    fn admin(store: &Arc<MemoryStore>) -> Session<MemoryStore> {
        Session::new(Arc::clone(store), Role::Admin, &ClientConfig::default())
    }

    #[tokio::test]
    async fn test_participants_cannot_administer() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::new(Arc::clone(&store), Role::Participant, &ClientConfig::default());

        assert_eq!(session.set_board_locked(true).await, Err(BoardError::NotAdmin));
        assert_eq!(session.reset_board().await, Err(BoardError::NotAdmin));
        assert_eq!(session.generate_axes().await, Err(BoardError::NotAdmin));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_max_selections_bounds() {
        let store = Arc::new(MemoryStore::new());
        let mut session = admin(&store);

        assert_eq!(
            session.set_max_selections(0).await,
            Err(BoardError::InvalidMaxSelections(0))
        );
        assert_eq!(
            session.set_max_selections(101).await,
            Err(BoardError::InvalidMaxSelections(101))
        );
        assert_eq!(session.set_max_selections(25).await, Ok(25));

        session.refresh();
        assert_eq!(session.max_allowed(), 25);
    }

    #[tokio::test]
    async fn test_toggle_lock_uses_cached_flag() {
        let store = Arc::new(MemoryStore::new());
        let mut session = admin(&store);

        assert_eq!(session.toggle_board_lock().await, Ok(true));
        session.refresh();
        assert_eq!(session.toggle_board_lock().await, Ok(false));
        session.refresh();
        assert!(!session.gate().board_locked());
    }

    #[tokio::test]
    async fn test_empty_winner_clears() {
        let store = Arc::new(MemoryStore::new());
        let mut session = admin(&store);

        session.set_winner(Quarter::Q2, "Alice").await.unwrap();
        session.refresh();
        assert_eq!(session.gate().winner(Quarter::Q2), Some("Alice"));

        session.set_winner(Quarter::Q2, "  ").await.unwrap();
        session.refresh();
        assert_eq!(session.gate().winner(Quarter::Q2), None);
        assert_eq!(session.gate().settings().winner_label(Quarter::Q2), "TBD");
    }

    #[tokio::test]
    async fn test_declined_reset_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        store.set(&paths::cell(&"0-0".parse().unwrap()), json!("Alice")).await.unwrap();
        let before = store.write_count();

        let mut session = admin(&store).with_confirmer(NeverConfirm);
        assert_eq!(session.reset_board().await, Ok(ResetOutcome::Cancelled));
        assert_eq!(store.write_count(), before);
    }
}
