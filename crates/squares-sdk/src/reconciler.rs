//! Claim reconciliation.
//!
//! Clicking a cell only decides what *would* happen from the cached view
//! ([`plan_claim`]). Anything that touches the shared board goes through a
//! single-key conditional write, so two sessions racing for the same cell
//! cannot both win, whatever their caches say.

use crate::cache::BoardCache;
use crate::confirm::Prompt;
use crate::error::{BoardError, Result};
use crate::gate::SettingsGate;
use crate::paths;
use crate::pending::PendingSelections;
use crate::session::{Role, Session, SessionEvent};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use squares_core::{Cell, CellKey, Participant};
use squares_store::{Predicate, RemoteStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a click on a cell resolves to, before any write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimPlan {
    /// Add an open cell to the pending set.
    Select,
    /// Drop a cell from the pending set.
    Unselect,
    /// Release a cell the participant already owns.
    ReleaseOwn,
    /// Admin removal of the claim held by `owner`.
    AdminRemove { owner: String },
}

/// Result of [`Session::toggle_claim`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    Selected { pending: usize },
    Unselected { pending: usize },
    /// The store released the cell.
    Removed,
    /// An admin removal found the cell already changed hands.
    AlreadyRemoved,
    /// The confirmer declined.
    Cancelled,
}

impl ClaimOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ClaimOutcome::Selected { .. } => "Selection added. Lock in to save.",
            ClaimOutcome::Unselected { .. } => "Selection removed.",
            ClaimOutcome::Removed => "Selection removed.",
            ClaimOutcome::AlreadyRemoved => "That selection was already removed.",
            ClaimOutcome::Cancelled => "",
        }
    }
}

/// Per-key result of a lock-in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    /// Keys this session now owns.
    pub committed: Vec<CellKey>,
    /// Keys someone else claimed first. They stay pending.
    pub conflicts: Vec<CellKey>,
    /// Keys whose write did not reach the store. They stay pending.
    pub failed: Vec<CellKey>,
}

impl CommitReport {
    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Status line for the participant.
    pub fn message(&self) -> String {
        if self.conflicts.is_empty() && self.failed.is_empty() {
            return "Selections saved.".to_string();
        }
        let mut message = format!(
            "{} saved, {} already taken.",
            self.committed.len(),
            self.conflicts.len()
        );
        if !self.failed.is_empty() {
            message.push_str(&format!(" {} could not be saved.", self.failed.len()));
        }
        message
    }
}

/// Result of [`Session::commit_pending`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    Cancelled,
    Settled(CommitReport),
}

/// Decide what a click on `key` means from the cached state alone.
pub fn plan_claim(
    key: &CellKey,
    participant: Option<&Participant>,
    role: Role,
    cache: &BoardCache,
    gate: &SettingsGate,
    pending: &PendingSelections,
) -> Result<ClaimPlan> {
    gate.check_writable(role)?;

    let owner = cache.owner(key);
    if role.is_admin() {
        return match owner {
            Some(owner) => Ok(ClaimPlan::AdminRemove {
                owner: owner.to_string(),
            }),
            None => Err(BoardError::NothingToRemove),
        };
    }

    let participant = participant.ok_or(BoardError::NameRequired)?;
    match owner {
        Some(owner) if owner == participant.name => Ok(ClaimPlan::ReleaseOwn),
        Some(owner) => Err(BoardError::AlreadyTaken(owner.to_string())),
        None if pending.contains(key) => Ok(ClaimPlan::Unselect),
        None => {
            gate.check_room(cache.saved_count(&participant.name), pending.len())?;
            Ok(ClaimPlan::Select)
        }
    }
}

/// Holds when the key is unclaimed at write time.
fn is_open() -> Predicate {
    Box::new(|current: &Value| current.is_null())
}

/// Holds when the key is still claimed by `name` at write time.
fn is_owned_by(name: String) -> Predicate {
    Box::new(move |current: &Value| {
        Cell::from_value(current).map_or(false, |cell| cell.name == name)
    })
}

impl<S: RemoteStore> Session<S> {
    /// Toggle the claim on one cell.
    ///
    /// Open cells move in and out of the pending set without touching the
    /// store. Owned cells are released with a conditional delete.
    pub async fn toggle_claim(&mut self, key: CellKey) -> Result<ClaimOutcome> {
        let plan = plan_claim(
            &key,
            self.participant.as_ref(),
            self.role,
            &self.cache,
            &self.gate,
            &self.pending,
        )
        .map_err(|err| {
            debug!(%key, error = %err, "claim refused");
            err
        })?;

        match plan {
            ClaimPlan::Select => {
                self.pending.insert(key);
                let pending = self.pending.len();
                self.emit(SessionEvent::PendingChanged { pending });
                Ok(ClaimOutcome::Selected { pending })
            }
            ClaimPlan::Unselect => {
                self.pending.remove(&key);
                let pending = self.pending.len();
                self.emit(SessionEvent::PendingChanged { pending });
                Ok(ClaimOutcome::Unselected { pending })
            }
            ClaimPlan::AdminRemove { owner } => {
                let prompt = Prompt::RemoveSelection {
                    key,
                    owner: owner.clone(),
                };
                if !self.confirmer.confirm(&prompt) {
                    return Ok(ClaimOutcome::Cancelled);
                }

                let removed = self
                    .store
                    .compare_and_swap(&paths::cell(&key), is_owned_by(owner.clone()), Value::Null)
                    .await?;
                if removed {
                    info!(%key, %owner, "admin removed selection");
                    Ok(ClaimOutcome::Removed)
                } else {
                    debug!(%key, %owner, "selection changed before admin removal");
                    Ok(ClaimOutcome::AlreadyRemoved)
                }
            }
            ClaimPlan::ReleaseOwn => {
                let name = self
                    .participant
                    .as_ref()
                    .map(|p| p.name.clone())
                    .ok_or(BoardError::NameRequired)?;

                let removed = self
                    .store
                    .compare_and_swap(&paths::cell(&key), is_owned_by(name.clone()), Value::Null)
                    .await?;
                if removed {
                    debug!(%key, %name, "released selection");
                    Ok(ClaimOutcome::Removed)
                } else {
                    warn!(%key, %name, "selection no longer held");
                    Err(BoardError::RemovalFailed)
                }
            }
        }
    }

    /// Commit every pending cell.
    ///
    /// Each key is an independent conditional write, so a lock-in can settle
    /// partially. Only committed keys leave the pending set; keys that lost
    /// their race or never reached the store stay for another attempt.
    pub async fn commit_pending(&mut self) -> Result<CommitOutcome> {
        if self.pending.is_empty() {
            return Err(BoardError::NothingPending);
        }
        let participant = self.participant.clone().ok_or(BoardError::NameRequired)?;
        self.gate.check_writable(self.role)?;

        let keys = self.pending.to_vec();
        if !self.confirmer.confirm(&Prompt::LockIn { count: keys.len() }) {
            return Ok(CommitOutcome::Cancelled);
        }

        let record = participant.to_cell().to_value();
        let writes = keys.iter().map(|key| {
            let store = Arc::clone(&self.store);
            let path = paths::cell(key);
            let record = record.clone();
            let key = *key;
            async move { (key, store.compare_and_swap(&path, is_open(), record).await) }
        });

        let mut report = CommitReport::default();
        for (key, result) in join_all(writes).await {
            match result {
                Ok(true) => report.committed.push(key),
                Ok(false) => report.conflicts.push(key),
                Err(err) => {
                    warn!(%key, error = %err, "claim write failed");
                    report.failed.push(key);
                }
            }
        }

        if !report.committed.is_empty() {
            if let Err(err) = self
                .store
                .set(&paths::lock(&participant.name), Value::Bool(true))
                .await
            {
                warn!(name = %participant.name, error = %err, "failed to record lock-in");
            }
        }

        self.pending.remove_all(&report.committed);

        info!(
            name = %participant.name,
            committed = report.committed.len(),
            conflicts = report.conflicts.len(),
            failed = report.failed.len(),
            "lock-in settled"
        );
        self.emit(SessionEvent::Committed {
            committed: report.committed.len(),
            conflicts: report.conflicts.len(),
        });
        self.emit(SessionEvent::PendingChanged {
            pending: self.pending.len(),
        });

        Ok(CommitOutcome::Settled(report))
    }
}
