// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session mutex map: serializes concurrent `Resume`/`Launch` calls
//! against the same session, load-or-store so first access creates the
//! entry lazily.

use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

#[derive(Default)]
pub struct SessionLockMap {
    locks: SyncMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SessionLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, session_id: &str) -> Arc<AsyncMutex<()>> {
        self.locks.lock().entry(session_id.to_string()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }

    /// Holds the per-session lock for the duration of `f`.
    pub async fn with_lock<T, F, Fut>(&self, session_id: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let lock = self.entry(session_id);
        let _guard = lock.lock().await;
        f().await
    }
}

#[cfg(test)]
#[path = "lock_map_tests.rs"]
mod tests;
