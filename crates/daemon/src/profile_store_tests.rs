use super::*;
use kandev_core::test_support::{test_agent, test_profile};

#[tokio::test]
async fn upsert_agent_and_save_profile_round_trip_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let agent = test_agent("codex");
    let profile = test_profile(&agent);

    let store = FileProfileStore::load(dir.path()).await.unwrap();
    store.upsert_agent(&agent).await.unwrap();
    store.save_profile(&profile).await.unwrap();

    let reloaded = FileProfileStore::load(dir.path()).await.unwrap();
    assert_eq!(reloaded.list_profiles(&agent.id).await, vec![profile.clone()]);
    assert_eq!(reloaded.profile(&profile.id), Some(profile));
}

#[tokio::test]
async fn list_profiles_filters_by_agent_id() {
    let dir = tempfile::tempdir().unwrap();
    let codex = test_agent("codex");
    let claude = test_agent("claude-code");
    let codex_profile = test_profile(&codex);
    let claude_profile = test_profile(&claude);

    let store = FileProfileStore::load(dir.path()).await.unwrap();
    store.save_profile(&codex_profile).await.unwrap();
    store.save_profile(&claude_profile).await.unwrap();

    assert_eq!(store.list_profiles(&codex.id).await, vec![codex_profile]);
}

#[tokio::test]
async fn load_tolerates_a_missing_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("does/not/exist/yet");

    let store = FileProfileStore::load(&nested).await.unwrap();

    assert!(store.list_profiles(&AgentId::new("codex")).await.is_empty());
}
