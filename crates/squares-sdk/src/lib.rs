//! Squares SDK - sessions and claim reconciliation for a shared squares board
//!
//! A 10x10 board is shared by every participant through a realtime
//! key-value store. Each participant picks cells locally, then locks them in;
//! every write that can race with another session is a single-key
//! conditional write, so the store alone decides who wins a contested cell.
//!
//! # Quick Start
//!
//! ```rust
//! use squares_sdk::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let client = Client::in_memory(ClientConfig::default());
//!
//! let mut alice = client.participant_session();
//! alice.enter("alice", "#86efac", "#0f172a").unwrap();
//! alice.toggle_claim("4-4".parse().unwrap()).await.unwrap();
//!
//! match alice.commit_pending().await.unwrap() {
//!     CommitOutcome::Settled(report) => println!("{}", report.message()),
//!     CommitOutcome::Cancelled => {}
//! }
//! # });
//! ```
//!
//! # Architecture
//!
//! - [`client`] - Entry point; opens sessions over one shared store
//! - [`session`] - Per-session context: identity, caches, pending set, events
//! - [`reconciler`] - Claim toggling and lock-in
//! - [`admin`] - Axis generation, board reset and settings writes
//! - [`cache`] - Local mirror of board, axes and lock flags
//! - [`gate`] - Lock and selection-cap policy
//! - [`pending`] - Uncommitted selections
//! - [`confirm`] - Confirmation prompts supplied by the front end
//! - [`paths`] - Store key layout
//! - [`error`] - Error types

pub mod admin;
pub mod cache;
pub mod client;
pub mod confirm;
pub mod error;
pub mod gate;
pub mod paths;
pub mod pending;
pub mod reconciler;
pub mod session;

// Re-exports for convenience
pub use admin::ResetOutcome;
pub use cache::BoardCache;
pub use client::{quick, Client, ClientConfig, ClientConfigBuilder};
pub use confirm::{AlwaysConfirm, Confirmer, NeverConfirm, Prompt};
pub use error::{BoardError, Result};
pub use gate::SettingsGate;
pub use pending::PendingSelections;
pub use reconciler::{plan_claim, ClaimOutcome, ClaimPlan, CommitOutcome, CommitReport};
pub use session::{CellView, Role, Session, SessionEvent};

// Re-export commonly used types from the lower crates
pub use squares_core::{Axes, Cell, CellKey, Participant, Quarter};
pub use squares_store::{MemoryStore, RemoteStore, StoreError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::client::{Client, ClientConfig};
    pub use crate::confirm::{Confirmer, Prompt};
    pub use crate::error::BoardError;
    pub use crate::reconciler::{ClaimOutcome, CommitOutcome};
    pub use crate::session::{Role, Session, SessionEvent};
    pub use squares_core::{CellKey, Quarter};
    pub use squares_store::{MemoryStore, RemoteStore};
}
