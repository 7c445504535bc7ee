// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kandev_core::test_support::test_agent;

#[test]
fn register_then_get_round_trips() {
    let registry = AgentRegistry::new();
    let agent = test_agent("codex");
    registry.register(agent.clone()).unwrap();
    assert_eq!(registry.get(&agent.id), Some(agent));
}

#[test]
fn duplicate_registration_is_rejected() {
    let registry = AgentRegistry::new();
    registry.register(test_agent("codex")).unwrap();
    let err = registry.register(test_agent("codex")).unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyRegistered(_)));
}

#[test]
fn unregister_removes_and_errors_on_missing() {
    let registry = AgentRegistry::new();
    let agent = test_agent("codex");
    registry.register(agent.clone()).unwrap();
    registry.unregister(&agent.id).unwrap();
    assert!(!registry.exists(&agent.id));
    assert!(matches!(registry.unregister(&agent.id), Err(RegistryError::NotFound(_))));
}

#[test]
fn list_enabled_excludes_disabled_agents() {
    let registry = AgentRegistry::new();
    let mut disabled = test_agent("old-agent");
    disabled.enabled = false;
    registry.register(disabled).unwrap();
    registry.register(test_agent("codex")).unwrap();

    let enabled = registry.list_enabled();
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].id.as_str(), "codex");
}

#[test]
fn list_enabled_orders_by_display_order_then_id() {
    let registry = AgentRegistry::new();
    let mut second = test_agent("bbb");
    second.display_order = 1;
    let mut first = test_agent("aaa");
    first.display_order = 1;
    let mut zeroth = test_agent("zzz");
    zeroth.display_order = 0;
    registry.register(second).unwrap();
    registry.register(first).unwrap();
    registry.register(zeroth).unwrap();

    let ids: Vec<&str> = registry.list_enabled().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["zzz", "aaa", "bbb"]);
}
