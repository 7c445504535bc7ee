// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::fakes::*;
use super::*;
use crate::task::{Task, TaskId, TaskState};

fn sample_task() -> Task {
    Task {
        id: TaskId::new(),
        repository_id: None,
        title: "Fix flaky test".to_string(),
        primary_session_id: None,
        state: TaskState::Queued,
        created_at_ms: 0,
        updated_at_ms: 0,
    }
}

#[tokio::test]
async fn fake_repository_round_trips_tasks() {
    let repo = FakeRepository::default();
    let task = sample_task();
    repo.save_task(&task).await.unwrap();
    let fetched = repo.get_task(&task.id.to_string()).await.unwrap();
    assert_eq!(fetched, task);
}

#[tokio::test]
async fn fake_repository_errors_on_missing_task() {
    let repo = FakeRepository::default();
    let err = repo.get_task("tsk-missing").await.unwrap_err();
    assert!(matches!(err, CollabError::Repository(_)));
}

#[tokio::test]
async fn fake_secret_store_errors_on_missing_secret() {
    let store = FakeSecretStore::default();
    let err = store.reveal("does-not-exist").await.unwrap_err();
    assert!(matches!(err, CollabError::SecretNotFound { .. }));
}

#[tokio::test]
async fn fake_shell_preference_defaults_to_bash() {
    let provider = FakeShellPreferenceProvider::default();
    assert_eq!(provider.preferred_shell().await.unwrap(), "/bin/bash");
}

#[tokio::test]
async fn fake_agent_manager_records_calls() {
    let client = FakeAgentManagerClient::default();
    client.cancel_agent("ses-1").await.unwrap();
    assert_eq!(client.calls.lock().as_slice(), ["cancel_agent:ses-1"]);
}

#[tokio::test]
async fn fake_notify_provider_records_title_and_message() {
    let notify = FakeNotifyProvider::default();
    notify.notify("Task complete", "fix-flaky-test is done").await;
    assert_eq!(
        notify.0.lock().as_slice(),
        [("Task complete".to_string(), "fix-flaky-test is done".to_string())]
    );
}
