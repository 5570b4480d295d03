//! The shared store trait.

use crate::error::Result;
use crate::path::StorePath;
use crate::subscription::Subscription;
use async_trait::async_trait;
use serde_json::Value;

/// Transaction body: given the current value, return the replacement, or
/// `None` to leave the key untouched.
///
/// Backends may invoke it more than once if the key changes underneath them.
pub type Updater = Box<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Precondition checked against the current value of a key.
pub type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// Result of a transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionOutcome {
    /// Whether the updater's value was written.
    pub committed: bool,
    /// The value at the path once the transaction settled.
    pub snapshot: Value,
}

/// A realtime key-value tree shared by every session.
///
/// Writing `Value::Null` deletes a key. Single-key transactions are the only
/// serialization point between sessions.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Read the current value of a subtree (`Null` when absent).
    async fn get(&self, path: &StorePath) -> Result<Value>;

    /// Subscribe to a subtree. The handle starts out holding the current value.
    fn subscribe(&self, path: &StorePath) -> Subscription;

    /// Overwrite a subtree unconditionally.
    async fn set(&self, path: &StorePath, value: Value) -> Result<()>;

    /// Atomic read-modify-write of a single key.
    async fn transaction(&self, path: &StorePath, updater: Updater) -> Result<TransactionOutcome>;

    /// Write `new_value` only if `predicate` holds for the value at write time.
    async fn compare_and_swap(
        &self,
        path: &StorePath,
        predicate: Predicate,
        new_value: Value,
    ) -> Result<bool> {
        let updater: Updater =
            Box::new(move |current: &Value| predicate(current).then(|| new_value.clone()));
        let outcome = self.transaction(path, updater).await?;
        Ok(outcome.committed)
    }
}
