//! # squares-store
//!
//! The shared state store the board is synchronized through.
//!
//! The store is a JSON tree addressed by slash-separated [`StorePath`]s and
//! offers three primitives:
//!
//! - [`RemoteStore::subscribe`] pushes the latest value of a subtree on
//!   every change
//! - [`RemoteStore::set`] overwrites a subtree unconditionally
//! - [`RemoteStore::transaction`] performs an atomic read-modify-write on a
//!   single key, reporting whether the new value was committed
//!
//! [`MemoryStore`] is an in-process backend used by tests, the CLI and the
//! stress harness. Hosted backends implement the same trait.

pub mod error;
pub mod memory;
pub mod path;
pub mod store;
pub mod subscription;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use path::StorePath;
pub use store::{Predicate, RemoteStore, TransactionOutcome, Updater};
pub use subscription::Subscription;
