// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::fakes::FakeProfileStore;
use super::*;
use crate::available::AgentAvailability;
use kandev_core::test_support::test_agent;
use kandev_registry::fakes::FakeDiscoveryCollaborator;
use kandev_registry::ModelCache;
use std::sync::Arc;

fn available_for(agent: kandev_core::Agent) -> (Arc<AgentRegistry>, AgentAvailability) {
    let registry = Arc::new(AgentRegistry::new());
    let id = agent.id.clone();
    registry.register(agent).unwrap();
    let discovery = FakeDiscoveryCollaborator::default();
    discovery.available.lock().insert(id, true);
    let availability = AgentAvailability::new(registry.clone(), Arc::new(discovery), Arc::new(ModelCache::new()));
    (registry, availability)
}

#[tokio::test]
async fn creates_default_profile_when_none_exist() {
    let (registry, availability) = available_for(test_agent("codex"));
    let store = FakeProfileStore::default();

    let outcomes = ensure_initial_agent_profiles(&registry, &availability, &store, 1_000).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], ProfileSyncOutcome::Created(p) if p.model == "test-model"));
    assert_eq!(store.list_profiles(&kandev_core::AgentId::new("codex")).await.len(), 1);
}

#[tokio::test]
async fn updates_non_user_modified_profile_when_agent_config_changes() {
    let (registry, availability) = available_for(test_agent("codex"));
    let store = FakeProfileStore::default();

    ensure_initial_agent_profiles(&registry, &availability, &store, 1_000).await.unwrap();
    let mut agent = test_agent("codex");
    agent.default_model = Some("new-model".to_string());
    registry.unregister(&agent.id).unwrap();
    registry.register(agent).unwrap();

    let outcomes = ensure_initial_agent_profiles(&registry, &availability, &store, 2_000).await.unwrap();

    assert!(matches!(&outcomes[0], ProfileSyncOutcome::Updated(profiles) if profiles[0].model == "new-model"));
}

#[tokio::test]
async fn leaves_user_modified_profile_untouched() {
    let (registry, availability) = available_for(test_agent("codex"));
    let store = FakeProfileStore::default();

    ensure_initial_agent_profiles(&registry, &availability, &store, 1_000).await.unwrap();
    let agent_id = kandev_core::AgentId::new("codex");
    {
        let mut profiles = store.profiles.lock();
        let entry = profiles.get_mut(&agent_id).unwrap();
        entry[0].user_modified = true;
        entry[0].model = "custom-model".to_string();
    }

    let mut agent = test_agent("codex");
    agent.default_model = Some("new-model".to_string());
    registry.unregister(&agent_id).unwrap();
    registry.register(agent).unwrap();

    let outcomes = ensure_initial_agent_profiles(&registry, &availability, &store, 2_000).await.unwrap();

    assert!(matches!(outcomes[0], ProfileSyncOutcome::Unchanged));
    assert_eq!(store.list_profiles(&agent_id).await[0].model, "custom-model");
}

#[tokio::test]
async fn second_run_with_no_changes_reports_unchanged() {
    let (registry, availability) = available_for(test_agent("codex"));
    let store = FakeProfileStore::default();

    ensure_initial_agent_profiles(&registry, &availability, &store, 1_000).await.unwrap();
    let outcomes = ensure_initial_agent_profiles(&registry, &availability, &store, 2_000).await.unwrap();

    assert!(matches!(outcomes[0], ProfileSyncOutcome::Unchanged));
}

#[tokio::test]
async fn passthrough_only_agent_uses_sentinel_model_and_display_name() {
    let mut agent = test_agent("claude-code");
    agent.default_model = None;
    agent.passthrough = Some(kandev_core::PassthroughConfig { command: vec!["claude".to_string()], prompt_flag: None });
    agent.display_name = Some("Claude Code".to_string());
    let (registry, availability) = available_for(agent);
    let store = FakeProfileStore::default();

    ensure_initial_agent_profiles(&registry, &availability, &store, 1_000).await.unwrap();

    let profiles = store.list_profiles(&kandev_core::AgentId::new("claude-code")).await;
    assert_eq!(profiles[0].model, PASSTHROUGH_MODEL);
    assert_eq!(profiles[0].name, "Claude Code");
    assert!(profiles[0].cli_passthrough);
}

#[tokio::test]
async fn missing_default_model_on_non_passthrough_agent_errors() {
    let mut agent = test_agent("codex");
    agent.default_model = None;
    let (registry, availability) = available_for(agent);
    let store = FakeProfileStore::default();

    let err = ensure_initial_agent_profiles(&registry, &availability, &store, 1_000).await.unwrap_err();

    assert_eq!(err, ProfileSyncError::ModelRequired(kandev_core::AgentId::new("codex")));
}
