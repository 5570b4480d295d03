//! Push subscriptions on a subtree.

use crate::error::{Result, StoreError};
use crate::path::StorePath;
use serde_json::Value;
use tokio::sync::watch;

/// Handle on a subscribed subtree.
///
/// Holds only the latest pushed value; intermediate values may be skipped.
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) cancels it.
#[derive(Debug)]
pub struct Subscription {
    path: StorePath,
    rx: watch::Receiver<Value>,
}

impl Subscription {
    pub fn new(path: StorePath, rx: watch::Receiver<Value>) -> Self {
        Self { path, rx }
    }

    pub fn path(&self) -> &StorePath {
        &self.path
    }

    /// The latest value, whether or not it has been seen.
    pub fn latest(&self) -> Value {
        self.rx.borrow().clone()
    }

    /// The latest value if it arrived since the last call, marking it seen.
    pub fn take_changed(&mut self) -> Option<Value> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Wait for the next push and return it.
    pub async fn changed(&mut self) -> Result<Value> {
        self.rx.changed().await.map_err(|_| StoreError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Cancel the subscription.
    pub fn unsubscribe(self) {}
}
