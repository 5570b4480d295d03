//! Conditional writes racing on the same key.

use futures::future::join_all;
use serde_json::{json, Value};
use squares_store::{MemoryStore, RemoteStore, StorePath};
use std::sync::Arc;
use std::time::Duration;

fn open_cell() -> squares_store::Predicate {
    Box::new(|current: &Value| current.is_null())
}

/// Many writers, one open key: exactly one wins.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_winner_per_key() {
    let store = Arc::new(MemoryStore::with_latency(Duration::from_millis(2)));
    let cell = StorePath::parse("board/5-5").unwrap();

    let attempts = (0..16).map(|i| {
        let store = Arc::clone(&store);
        let cell = cell.clone();
        tokio::spawn(async move {
            let claimed = store
                .compare_and_swap(&cell, open_cell(), json!({ "name": format!("P{}", i) }))
                .await
                .unwrap();
            (i, claimed)
        })
    });

    let results: Vec<(usize, bool)> = join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let winners: Vec<usize> = results.iter().filter(|(_, won)| *won).map(|(i, _)| *i).collect();
    assert_eq!(winners.len(), 1);

    let stored = store.get(&cell).await.unwrap();
    assert_eq!(stored["name"], format!("P{}", winners[0]));
    assert_eq!(store.write_count(), 1);
}

/// Writers on different keys never interfere.
#[tokio::test]
async fn test_distinct_keys_all_commit() {
    let store = Arc::new(MemoryStore::new());

    let attempts = (0..10u8).map(|col| {
        let store = Arc::clone(&store);
        async move {
            let cell = StorePath::parse(&format!("board/0-{}", col)).unwrap();
            store
                .compare_and_swap(&cell, open_cell(), json!("Alice"))
                .await
                .unwrap()
        }
    });

    let committed = join_all(attempts).await;
    assert!(committed.into_iter().all(|c| c));

    let board = store.get(&StorePath::parse("board").unwrap()).await.unwrap();
    assert_eq!(board.as_object().map(|m| m.len()), Some(10));
}

/// A subscriber sees the final state after a burst of writes.
#[tokio::test]
async fn test_subscriber_converges_on_latest() {
    let store = MemoryStore::new();
    let mut board = store.subscribe(&StorePath::parse("board").unwrap());

    for col in 0..5 {
        let cell = StorePath::parse(&format!("board/1-{}", col)).unwrap();
        store.set(&cell, json!("Bob")).await.unwrap();
    }

    let latest = board.changed().await.unwrap();
    assert_eq!(latest.as_object().map(|m| m.len()), Some(5));
    assert_eq!(board.take_changed(), None);
}
