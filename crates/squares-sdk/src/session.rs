//! Per-browser session context.
//!
//! A [`Session`] owns everything one participant's view of the board needs:
//! the identity they entered, their pending selections, and local mirrors of
//! the shared subtrees. The mirrors are refreshed only from store pushes,
//! via [`Session::refresh`] or [`Session::next_change`].

use crate::cache::BoardCache;
use crate::client::ClientConfig;
use crate::confirm::{AlwaysConfirm, Confirmer};
use crate::error::{BoardError, Result};
use crate::gate::SettingsGate;
use crate::paths;
use crate::pending::PendingSelections;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use squares_core::{format_name, random_color, AxisGenerator, Cell, CellKey, Participant};
use squares_store::{RemoteStore, Subscription};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;
use ulid::Ulid;

/// What the person behind a session is allowed to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Participant,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Events emitted by a session after its state changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new board snapshot arrived.
    BoardUpdated { filled: usize },
    /// New axes arrived.
    AxesUpdated,
    /// Lock flags changed.
    LocksUpdated,
    /// Settings changed.
    SettingsUpdated,
    /// The pending selection set changed.
    PendingChanged { pending: usize },
    /// A lock-in finished.
    Committed { committed: usize, conflicts: usize },
    /// An administrator wiped the board from this session.
    BoardReset,
}

/// How one cell looks from this session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Open,
    Pending,
    Owned { cell: Cell, mine: bool },
}

#[derive(Clone, Copy, Debug)]
enum Feed {
    Board,
    Axes,
    Locks,
    Settings,
}

impl Feed {
    const ALL: [Feed; 4] = [Feed::Board, Feed::Axes, Feed::Locks, Feed::Settings];
}

struct Feeds {
    board: Subscription,
    axes: Subscription,
    locks: Subscription,
    settings: Subscription,
}

impl Feeds {
    fn open<S: RemoteStore>(store: &S) -> Self {
        Self {
            board: store.subscribe(&paths::board()),
            axes: store.subscribe(&paths::axes()),
            locks: store.subscribe(&paths::locks()),
            settings: store.subscribe(&paths::settings()),
        }
    }

    fn get_mut(&mut self, feed: Feed) -> &mut Subscription {
        match feed {
            Feed::Board => &mut self.board,
            Feed::Axes => &mut self.axes,
            Feed::Locks => &mut self.locks,
            Feed::Settings => &mut self.settings,
        }
    }
}

/// One participant's (or administrator's) connection to the board.
pub struct Session<S: RemoteStore> {
    id: Ulid,
    pub(crate) store: Arc<S>,
    pub(crate) role: Role,
    pub(crate) participant: Option<Participant>,
    pub(crate) confirmer: Arc<dyn Confirmer>,
    pub(crate) cache: BoardCache,
    pub(crate) gate: SettingsGate,
    pub(crate) pending: PendingSelections,
    pub(crate) axis_generator: AxisGenerator,
    rng: StdRng,
    feeds: Feeds,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl<S: RemoteStore> Session<S> {
    /// Open a session and load the current shared state.
    pub fn new(store: Arc<S>, role: Role, config: &ClientConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let axis_generator = match config.axis_seed {
            Some(seed) => AxisGenerator::seeded(seed),
            None => AxisGenerator::from_entropy(),
        };
        let feeds = Feeds::open(store.as_ref());

        let mut session = Self {
            id: Ulid::new(),
            store,
            role,
            participant: None,
            confirmer: Arc::new(AlwaysConfirm),
            cache: BoardCache::new(),
            gate: SettingsGate::new(config.default_max_selections),
            pending: PendingSelections::new(),
            axis_generator,
            rng: StdRng::from_entropy(),
            feeds,
            event_tx,
        };

        for feed in Feed::ALL {
            let value = session.feeds.get_mut(feed).latest();
            session.apply(feed, &value);
        }
        debug!(session = %session.id, ?role, "session opened");
        session
    }

    /// Builder-style replacement of the confirmation seam.
    pub fn with_confirmer(mut self, confirmer: impl Confirmer + 'static) -> Self {
        self.confirmer = Arc::new(confirmer);
        self
    }

    /// Replace the confirmation seam in place.
    pub fn set_confirmer(&mut self, confirmer: impl Confirmer + 'static) {
        self.confirmer = Arc::new(confirmer);
    }

    /// Get the session ID.
    pub fn id(&self) -> Ulid {
        self.id
    }

    /// Get the shared store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Get the session role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether this session may run admin operations.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    // --- identity ---------------------------------------------------------

    /// Enter (or switch to) a participant name.
    ///
    /// A name that already owns cells keeps the colors it claimed them with.
    pub fn enter(&mut self, name: &str, color: &str, text_color: &str) -> Result<&Participant> {
        let name = format_name(name).ok_or(BoardError::NameRequired)?;
        let mut participant = Participant::new(name, color, text_color);
        participant.adopt_colors_from(self.cache.board());
        debug!(session = %self.id, name = %participant.name, "participant entered");
        Ok(self.participant.insert(participant))
    }

    /// The entered participant, if any.
    pub fn participant(&self) -> Option<&Participant> {
        self.participant.as_ref()
    }

    /// A fresh fill color to offer a new participant.
    pub fn suggested_color(&mut self) -> String {
        random_color(&mut self.rng)
    }

    /// Forget the identity and every pending selection.
    pub fn leave(&mut self) {
        self.participant = None;
        self.pending.clear();
        self.emit(SessionEvent::PendingChanged { pending: 0 });
    }

    // --- store pushes -----------------------------------------------------

    fn apply(&mut self, feed: Feed, value: &Value) {
        match feed {
            Feed::Board => {
                self.cache.apply_board(value);
                if let Some(participant) = self.participant.as_mut() {
                    participant.adopt_colors_from(self.cache.board());
                }
                self.emit(SessionEvent::BoardUpdated {
                    filled: self.cache.board().filled_count(),
                });
            }
            Feed::Axes => {
                self.cache.apply_axes(value);
                self.emit(SessionEvent::AxesUpdated);
            }
            Feed::Locks => {
                self.cache.apply_locks(value);
                self.emit(SessionEvent::LocksUpdated);
            }
            Feed::Settings => {
                self.gate.apply(value);
                self.emit(SessionEvent::SettingsUpdated);
            }
        }
    }

    /// Apply every snapshot pushed since the last refresh.
    ///
    /// Returns true when anything changed.
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        for feed in Feed::ALL {
            if let Some(value) = self.feeds.get_mut(feed).take_changed() {
                self.apply(feed, &value);
                changed = true;
            }
        }
        changed
    }

    /// Wait for the next push on any subscribed subtree and apply it.
    pub async fn next_change(&mut self) -> Result<()> {
        let (feed, value) = tokio::select! {
            value = self.feeds.board.changed() => (Feed::Board, value?),
            value = self.feeds.axes.changed() => (Feed::Axes, value?),
            value = self.feeds.locks.changed() => (Feed::Locks, value?),
            value = self.feeds.settings.changed() => (Feed::Settings, value?),
        };
        self.apply(feed, &value);
        self.refresh();
        Ok(())
    }

    // --- views ------------------------------------------------------------

    /// Get the board state cache.
    pub fn cache(&self) -> &BoardCache {
        &self.cache
    }

    /// Get the settings gate.
    pub fn gate(&self) -> &SettingsGate {
        &self.gate
    }

    /// Cells picked but not yet locked in.
    pub fn pending(&self) -> &PendingSelections {
        &self.pending
    }

    /// Drop a pending key without consulting the board.
    pub fn discard_pending(&mut self, key: &CellKey) -> bool {
        let removed = self.pending.remove(key);
        if removed {
            self.emit(SessionEvent::PendingChanged {
                pending: self.pending.len(),
            });
        }
        removed
    }

    /// How `key` should be drawn for this session.
    pub fn cell_view(&self, key: &CellKey) -> CellView {
        match self.cache.cell(key) {
            Some(cell) => CellView::Owned {
                mine: self
                    .participant
                    .as_ref()
                    .map_or(false, |p| cell.is_owned_by(&p.name)),
                cell: cell.clone(),
            },
            None if self.pending.contains(key) => CellView::Pending,
            None => CellView::Open,
        }
    }

    /// Cells this participant already owns on the board.
    pub fn saved_count(&self) -> usize {
        self.participant
            .as_ref()
            .map_or(0, |p| self.cache.saved_count(&p.name))
    }

    /// Number of pending cells.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Current selection cap.
    pub fn max_allowed(&self) -> u32 {
        self.gate.max_allowed()
    }

    /// Cells this participant can still pick.
    pub fn selections_left(&self) -> usize {
        self.gate
            .selections_left(self.saved_count(), self.pending_count())
    }

    /// Owned cell count per name, largest first.
    pub fn name_counts(&self) -> Vec<(String, usize)> {
        self.cache.board().name_counts()
    }

    /// Whether this participant has locked in before.
    pub fn is_locked_in(&self) -> bool {
        self.participant
            .as_ref()
            .map_or(false, |p| self.cache.is_locked_in(&p.name))
    }

    /// Label for the commit button.
    pub fn lock_in_label(&self) -> &'static str {
        if self.is_locked_in() {
            "Save Updated Selections"
        } else {
            "Lock In Selections"
        }
    }
}
