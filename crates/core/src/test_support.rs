// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builders for assembling valid domain values in tests without repeating
//! every field. Gated the same way as the collaborator fakes, so downstream
//! crates only pay for this under `test-support`/`cfg(test)`.

use crate::agent::{Agent, AgentCapabilities, AgentId, Logo};
use crate::profile::{AgentProfile, AgentProfileId};
use crate::session::{SessionId, SessionState, TaskSession};
use crate::task::{Task, TaskId, TaskState};
use std::collections::BTreeMap;

pub fn test_agent(id: &str) -> Agent {
    Agent {
        id: AgentId::new(id),
        name: id.to_string(),
        display_name: None,
        enabled: true,
        display_order: 0,
        base_command: vec![id.to_string()],
        model_flag: Some(vec!["--model".to_string(), "{model}".to_string()]),
        default_model: Some("test-model".to_string()),
        capabilities: AgentCapabilities {
            supports_session_resume: true,
            supports_shell: true,
            workspace_only: false,
            supports_dynamic_models: false,
        },
        permissions: BTreeMap::new(),
        passthrough: None,
        logo: Logo::default(),
        supports_mcp: false,
        mcp_config_path: None,
    }
}

pub fn test_profile(agent: &Agent) -> AgentProfile {
    AgentProfile {
        id: AgentProfileId::new(),
        agent_id: agent.id.clone(),
        name: format!("{} (default)", agent.resolved_display_name()),
        agent_display_name: agent.resolved_display_name().to_string(),
        model: agent.default_model.clone().unwrap_or_default(),
        auto_approve: false,
        allow_indexing: true,
        dangerously_skip_permissions: false,
        cli_passthrough: false,
        user_modified: false,
        created_at_ms: 0,
        updated_at_ms: 0,
    }
}

pub fn test_task() -> Task {
    Task {
        id: TaskId::new(),
        repository_id: None,
        title: "test task".to_string(),
        primary_session_id: None,
        state: TaskState::Queued,
        created_at_ms: 0,
        updated_at_ms: 0,
    }
}

pub fn test_session(task: &Task, profile: &AgentProfile) -> TaskSession {
    TaskSession {
        id: SessionId::new(),
        task_id: task.id.clone(),
        agent_profile_id: profile.id.clone(),
        repository_id: task.repository_id.clone(),
        base_branch: None,
        state: SessionState::Created,
        agent_execution_id: None,
        container_id: None,
        error_message: None,
        agent_profile_snapshot: profile.clone(),
        executor_id: None,
        executor_profile_id: None,
        workflow_step_id: None,
        is_primary: true,
        is_passthrough: profile.is_passthrough_model(),
        started_at_ms: 0,
        updated_at_ms: 0,
        completed_at_ms: None,
        worktrees: Vec::new(),
    }
}

/// `proptest::Strategy` generators for domain enums, shared so downstream
/// crates don't each hand-roll their own `prop_oneof!` arms.
pub mod strategies {
    use crate::session::SessionState;
    use crate::task::TaskState;
    use proptest::prelude::*;

    pub fn arb_session_state() -> impl Strategy<Value = SessionState> {
        prop_oneof![
            Just(SessionState::Created),
            Just(SessionState::Starting),
            Just(SessionState::Running),
            Just(SessionState::WaitingForInput),
            Just(SessionState::Cancelled),
            Just(SessionState::Failed),
            Just(SessionState::Completed),
        ]
    }

    pub fn arb_task_state() -> impl Strategy<Value = TaskState> {
        prop_oneof![
            Just(TaskState::Queued),
            Just(TaskState::InProgress),
            Just(TaskState::Review),
            Just(TaskState::Failed),
            Just(TaskState::Done),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose_into_a_valid_session() {
        let agent = test_agent("codex");
        let profile = test_profile(&agent);
        let task = test_task();
        let session = test_session(&task, &profile);

        assert_eq!(session.task_id, task.id);
        assert_eq!(session.agent_profile_id, profile.id);
        assert!(!session.is_passthrough);
    }
}
