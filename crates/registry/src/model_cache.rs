// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent model-list cache. `IsValid`/`IsStale` gate whether
//! `fetch_models_with_cache` can skip calling the agent's own `ListModels`.

use kandev_core::AgentId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCacheEntry {
    pub models: Vec<String>,
    pub error: Option<String>,
    pub cached_at_ms: u64,
}

impl ModelCacheEntry {
    /// Fresh: within `ttl` of `now_ms` and carrying no error.
    pub fn is_valid(&self, now_ms: u64, ttl: Duration) -> bool {
        self.error.is_none() && now_ms.saturating_sub(self.cached_at_ms) < ttl.as_millis() as u64
    }

    /// Usable but due for a refresh: has models and no error, but outside
    /// the fresh window.
    pub fn is_stale(&self, now_ms: u64, ttl: Duration) -> bool {
        self.error.is_none() && !self.models.is_empty() && !self.is_valid(now_ms, ttl)
    }
}

#[derive(Default)]
pub struct ModelCache {
    entries: RwLock<HashMap<AgentId, ModelCacheEntry>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a usable cached entry (valid or stale, with models and no
    /// error) if one exists.
    pub fn get_usable(&self, agent_id: &AgentId, now_ms: u64, ttl: Duration) -> Option<ModelCacheEntry> {
        let entries = self.entries.read();
        let entry = entries.get(agent_id)?;
        if entry.is_valid(now_ms, ttl) || entry.is_stale(now_ms, ttl) {
            Some(entry.clone())
        } else {
            None
        }
    }

    pub fn put_success(&self, agent_id: AgentId, models: Vec<String>, now_ms: u64) {
        self.entries.write().insert(agent_id, ModelCacheEntry { models, error: None, cached_at_ms: now_ms });
    }

    pub fn put_error(&self, agent_id: AgentId, error: String, now_ms: u64) {
        self.entries.write().insert(
            agent_id,
            ModelCacheEntry { models: Vec::new(), error: Some(error), cached_at_ms: now_ms },
        );
    }

    pub fn invalidate(&self, agent_id: &AgentId) {
        self.entries.write().remove(agent_id);
    }
}

#[cfg(test)]
#[path = "model_cache_tests.rs"]
mod tests;
