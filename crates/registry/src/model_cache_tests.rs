// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const TTL: Duration = Duration::from_millis(1_000);

#[test]
fn fresh_entry_is_valid_not_stale() {
    let entry = ModelCacheEntry { models: vec!["gpt-5".to_string()], error: None, cached_at_ms: 1_000 };
    assert!(entry.is_valid(1_500, TTL));
    assert!(!entry.is_stale(1_500, TTL));
}

#[test]
fn expired_entry_with_models_is_stale_not_valid() {
    let entry = ModelCacheEntry { models: vec!["gpt-5".to_string()], error: None, cached_at_ms: 1_000 };
    assert!(!entry.is_valid(5_000, TTL));
    assert!(entry.is_stale(5_000, TTL));
}

#[test]
fn errored_entry_is_never_valid_or_stale() {
    let entry = ModelCacheEntry { models: Vec::new(), error: Some("boom".to_string()), cached_at_ms: 1_000 };
    assert!(!entry.is_valid(1_100, TTL));
    assert!(!entry.is_stale(1_100, TTL));
}

#[test]
fn cache_returns_valid_and_stale_entries_but_not_errored() {
    let cache = ModelCache::new();
    let codex = AgentId::new("codex");
    cache.put_success(codex.clone(), vec!["gpt-5".to_string()], 1_000);
    assert!(cache.get_usable(&codex, 1_500, TTL).is_some());
    assert!(cache.get_usable(&codex, 5_000, TTL).is_some());

    cache.put_error(codex.clone(), "down".to_string(), 5_000);
    assert!(cache.get_usable(&codex, 5_100, TTL).is_none());
}

#[test]
fn invalidate_clears_the_entry() {
    let cache = ModelCache::new();
    let codex = AgentId::new("codex");
    cache.put_success(codex.clone(), vec!["gpt-5".to_string()], 1_000);
    cache.invalidate(&codex);
    assert!(cache.get_usable(&codex, 1_000, TTL).is_none());
}
