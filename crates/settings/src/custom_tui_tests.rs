// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::fakes::FakeCustomTuiStore;
use super::*;
use proptest::prelude::*;

fn request() -> CustomTuiAgentRequest {
    CustomTuiAgentRequest {
        display_name: "My Agent".to_string(),
        model: "gpt-5".to_string(),
        command: vec!["my-agent".to_string()],
        description: "a custom TUI agent".to_string(),
    }
}

#[yare::parameterized(
    basic = { "My Agent", "my-agent" },
    padded_whitespace = { "  hello  world  ", "hello-world" },
    only_symbols = { "!!!", "" },
    collapses_runs = { "a--b", "a-b" },
    accented = { "múltiple àccénts", "m-ltiple-cc-nts" },
)]
fn slugify_matrix(input: &str, expected: &str) {
    assert_eq!(slugify(input), expected);
}

#[tokio::test]
async fn registers_agent_and_default_passthrough_profile() {
    let registry = Arc::new(AgentRegistry::new());
    let store = FakeCustomTuiStore::default();

    let (agent, profile) = register_custom_tui_agent(&registry, &store, request(), 1_000).await.unwrap();

    assert_eq!(agent.id, AgentId::new("my-agent"));
    assert!(registry.exists(&agent.id));
    assert!(profile.cli_passthrough);
    assert_eq!(profile.model, PASSTHROUGH_MODEL);
    assert_eq!(profile.name, "gpt-5");
    assert_eq!(store.persisted_agents.lock().len(), 1);
    assert_eq!(store.persisted_profiles.lock().len(), 1);
}

#[tokio::test]
async fn profile_name_falls_back_to_display_name_when_model_empty() {
    let registry = Arc::new(AgentRegistry::new());
    let store = FakeCustomTuiStore::default();
    let mut req = request();
    req.model = "".to_string();

    let (_, profile) = register_custom_tui_agent(&registry, &store, req, 1_000).await.unwrap();

    assert_eq!(profile.name, "My Agent");
}

#[tokio::test]
async fn empty_slug_is_rejected() {
    let registry = Arc::new(AgentRegistry::new());
    let store = FakeCustomTuiStore::default();
    let mut req = request();
    req.display_name = "!!!".to_string();

    let err = register_custom_tui_agent(&registry, &store, req, 0).await.unwrap_err();

    assert_eq!(err, CustomTuiError::InvalidSlug);
}

#[tokio::test]
async fn empty_command_is_rejected() {
    let registry = Arc::new(AgentRegistry::new());
    let store = FakeCustomTuiStore::default();
    let mut req = request();
    req.command = vec![];

    let err = register_custom_tui_agent(&registry, &store, req, 0).await.unwrap_err();

    assert_eq!(err, CustomTuiError::CommandRequired);
}

#[tokio::test]
async fn existing_registry_slug_is_rejected() {
    let registry = Arc::new(AgentRegistry::new());
    registry.register(kandev_core::test_support::test_agent("my-agent")).unwrap();
    let store = FakeCustomTuiStore::default();

    let err = register_custom_tui_agent(&registry, &store, request(), 0).await.unwrap_err();

    assert_eq!(err, CustomTuiError::AgentAlreadyExists("my-agent".to_string()));
}

#[tokio::test]
async fn existing_store_slug_is_rejected() {
    let registry = Arc::new(AgentRegistry::new());
    let store = FakeCustomTuiStore::default();
    store.existing.lock().insert(AgentId::new("my-agent"));

    let err = register_custom_tui_agent(&registry, &store, request(), 0).await.unwrap_err();

    assert_eq!(err, CustomTuiError::AgentAlreadyExists("my-agent".to_string()));
}

#[tokio::test]
async fn persist_failure_rolls_back_registry_registration() {
    let registry = Arc::new(AgentRegistry::new());
    let store = FakeCustomTuiStore::default();
    *store.fail_persist.lock() = true;

    let err = register_custom_tui_agent(&registry, &store, request(), 0).await.unwrap_err();

    assert!(matches!(err, CustomTuiError::PersistFailed(_)));
    assert!(!registry.exists(&AgentId::new("my-agent")));
}

proptest! {
    #[test]
    fn slugify_is_idempotent(input in ".{0,40}") {
        let once = slugify(&input);
        let twice = slugify(&once);
        prop_assert_eq!(once, twice);
    }
}
