//! In-process store backend.
//!
//! The whole tree sits behind one lock, so a transaction's read and write
//! happen without any other writer in between. Arrays are stored as leaf
//! values; paths address object keys.

use crate::error::{Result, StoreError};
use crate::path::StorePath;
use crate::store::{RemoteStore, TransactionOutcome, Updater};
use crate::subscription::Subscription;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, trace};

struct Watcher {
    path: StorePath,
    tx: watch::Sender<Value>,
}

/// Shared in-memory JSON tree with push subscriptions.
pub struct MemoryStore {
    root: RwLock<Value>,
    watchers: Mutex<Vec<Watcher>>,
    online: AtomicBool,
    writes: AtomicU64,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Null),
            watchers: Mutex::new(Vec::new()),
            online: AtomicBool::new(true),
            writes: AtomicU64::new(0),
            latency: None,
        }
    }

    /// Delay every write by `latency` before it is applied.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new()
        }
    }

    /// Simulate losing (or regaining) the connection. Offline writes fail.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Number of writes applied so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        self.root.read().clone()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let mut watchers = self.watchers.lock();
        watchers.retain(|w| !w.tx.is_closed());
        watchers.len()
    }

    async fn before_write(&self, path: &StorePath) -> Result<()> {
        path.validate()?;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if !self.is_online() {
            return Err(StoreError::Unavailable(format!("offline while writing {}", path)));
        }
        Ok(())
    }

    /// Apply a write while holding the tree lock, then push to overlapping watchers.
    fn apply(&self, root: &mut Value, path: &StorePath, value: Value) {
        write_at(root, path.segments(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut watchers = self.watchers.lock();
        let before = watchers.len();
        watchers.retain(|w| !w.tx.is_closed());
        if watchers.len() != before {
            trace!(pruned = before - watchers.len(), "dropped closed subscriptions");
        }

        for watcher in watchers.iter().filter(|w| w.path.overlaps(path)) {
            let next = read_at(root, &watcher.path).cloned().unwrap_or(Value::Null);
            watcher.tx.send_if_modified(|current| {
                if *current != next {
                    *current = next;
                    true
                } else {
                    false
                }
            });
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get(&self, path: &StorePath) -> Result<Value> {
        path.validate()?;
        let root = self.root.read();
        Ok(read_at(&root, path).cloned().unwrap_or(Value::Null))
    }

    fn subscribe(&self, path: &StorePath) -> Subscription {
        let root = self.root.read();
        let current = read_at(&root, path).cloned().unwrap_or(Value::Null);
        let (tx, rx) = watch::channel(current);
        self.watchers.lock().push(Watcher {
            path: path.clone(),
            tx,
        });
        Subscription::new(path.clone(), rx)
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        self.before_write(path).await?;
        let value = prune(value);
        debug!(%path, delete = value.is_null(), "set");

        let mut root = self.root.write();
        self.apply(&mut root, path, value);
        Ok(())
    }

    async fn transaction(&self, path: &StorePath, updater: Updater) -> Result<TransactionOutcome> {
        self.before_write(path).await?;

        let mut root = self.root.write();
        let current = read_at(&root, path).cloned().unwrap_or(Value::Null);

        match updater(&current) {
            Some(next) => {
                let next = prune(next);
                self.apply(&mut root, path, next.clone());
                debug!(%path, "transaction committed");
                Ok(TransactionOutcome {
                    committed: true,
                    snapshot: next,
                })
            }
            None => {
                debug!(%path, "transaction aborted by precondition");
                Ok(TransactionOutcome {
                    committed: false,
                    snapshot: current,
                })
            }
        }
    }
}

fn read_at<'a>(root: &'a Value, path: &StorePath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| match node {
            Value::Object(entries) => entries.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|value| !value.is_null())
}

fn write_at(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }

    if let Value::Object(entries) = node {
        if rest.is_empty() {
            if value.is_null() {
                entries.remove(head);
            } else {
                entries.insert(head.clone(), value);
            }
        } else {
            let child = entries.entry(head.clone()).or_insert(Value::Null);
            write_at(child, rest, value);
            if child.is_null() {
                entries.remove(head);
            }
        }

        if entries.is_empty() {
            *node = Value::Null;
        }
    }
}

/// Drop nulls and empty objects, so deleting the last child deletes the parent.
fn prune(value: Value) -> Value {
    match value {
        Value::Object(entries) => {
            let kept: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, prune(v)))
                .filter(|(_, v)| !v.is_null())
                .collect();
            if kept.is_empty() {
                Value::Null
            } else {
                Value::Object(kept)
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> StorePath {
        StorePath::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();
        store.set(&path("settings/maxSelections"), json!(5)).await.unwrap();

        assert_eq!(store.get(&path("settings/maxSelections")).await.unwrap(), json!(5));
        assert_eq!(store.get(&path("settings")).await.unwrap(), json!({ "maxSelections": 5 }));
        assert_eq!(store.get(&path("board")).await.unwrap(), Value::Null);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_null_deletes_and_prunes_parents() {
        let store = MemoryStore::new();
        store.set(&path("settings/winners/q1"), json!("Alice")).await.unwrap();
        store.set(&path("settings/winners/q1"), Value::Null).await.unwrap();

        assert_eq!(store.get(&path("settings/winners")).await.unwrap(), Value::Null);
        assert_eq!(store.snapshot(), Value::Null);
    }

    #[tokio::test]
    async fn test_empty_object_is_deletion() {
        let store = MemoryStore::new();
        store.set(&path("locks/Alice"), json!(true)).await.unwrap();
        store.set(&path("locks"), json!({})).await.unwrap();
        assert_eq!(store.get(&path("locks")).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_transaction_precondition() {
        let store = MemoryStore::new();
        let cell = path("board/0-0");

        let first = store
            .transaction(&cell, Box::new(|cur: &Value| cur.is_null().then(|| json!("Alice"))))
            .await
            .unwrap();
        assert!(first.committed);

        let second = store
            .transaction(&cell, Box::new(|cur: &Value| cur.is_null().then(|| json!("Bob"))))
            .await
            .unwrap();
        assert!(!second.committed);
        assert_eq!(second.snapshot, json!("Alice"));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let store = MemoryStore::new();
        let cell = path("board/1-1");
        store.set(&cell, json!({ "name": "Alice" })).await.unwrap();

        let swapped = store
            .compare_and_swap(&cell, Box::new(|cur: &Value| cur["name"] == "Bob"), Value::Null)
            .await
            .unwrap();
        assert!(!swapped);

        let swapped = store
            .compare_and_swap(&cell, Box::new(|cur: &Value| cur["name"] == "Alice"), Value::Null)
            .await
            .unwrap();
        assert!(swapped);
        assert_eq!(store.get(&cell).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_subscription_sees_descendant_and_ancestor_writes() {
        let store = MemoryStore::new();
        let mut board = store.subscribe(&path("board"));
        let mut settings = store.subscribe(&path("settings"));

        store.set(&path("board/2-3"), json!("Alice")).await.unwrap();
        assert_eq!(board.take_changed(), Some(json!({ "2-3": "Alice" })));
        assert_eq!(settings.take_changed(), None);

        store.set(&StorePath::root(), Value::Null).await.unwrap();
        assert_eq!(board.take_changed(), Some(Value::Null));
    }

    #[tokio::test]
    async fn test_offline_writes_fail() {
        let store = MemoryStore::new();
        store.set_online(false);

        let err = store.set(&path("board/0-0"), json!("Alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.write_count(), 0);

        store.set_online(true);
        store.set(&path("board/0-0"), json!("Alice")).await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_subscriptions_are_pruned() {
        let store = MemoryStore::new();
        let sub = store.subscribe(&path("board"));
        let _kept = store.subscribe(&path("axes"));
        assert_eq!(store.subscriber_count(), 2);

        sub.unsubscribe();
        assert_eq!(store.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_path_rejected() {
        let store = MemoryStore::new();
        let bad = StorePath::root().child("locks").child("a/b");
        assert!(matches!(
            store.set(&bad, json!(true)).await,
            Err(StoreError::InvalidPath(_))
        ));
    }
}
