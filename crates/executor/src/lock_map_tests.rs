// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[tokio::test]
async fn serializes_concurrent_calls_on_same_session() {
    let map = Arc::new(SessionLockMap::new());
    let counter = Arc::new(AtomicU32::new(0));
    let max_concurrent = Arc::new(AtomicU32::new(0));

    let mut handles = Vec::new();
    for _ in 0..5 {
        let map = map.clone();
        let counter = counter.clone();
        let max_concurrent = max_concurrent.clone();
        handles.push(tokio::spawn(async move {
            map.with_lock("ses-shared", || async {
                let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
                max_concurrent.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                counter.fetch_sub(1, Ordering::SeqCst);
            })
            .await;
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(max_concurrent.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn different_sessions_run_concurrently() {
    let map = Arc::new(SessionLockMap::new());
    let start = std::time::Instant::now();

    let a = {
        let map = map.clone();
        tokio::spawn(async move {
            map.with_lock("ses-a", || async { tokio::time::sleep(Duration::from_millis(20)).await }).await;
        })
    };
    let b = {
        let map = map.clone();
        tokio::spawn(async move {
            map.with_lock("ses-b", || async { tokio::time::sleep(Duration::from_millis(20)).await }).await;
        })
    };
    a.await.unwrap();
    b.await.unwrap();

    assert!(start.elapsed() < Duration::from_millis(38));
}
