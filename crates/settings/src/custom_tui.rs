// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom-TUI agent registration: lets a user point the settings controller
//! at an arbitrary TUI/CLI binary and register it as a passthrough agent.

use async_trait::async_trait;
use kandev_core::{
    Agent, AgentCapabilities, AgentId, AgentProfile, AgentProfileId, Logo, PassthroughConfig,
    PASSTHROUGH_MODEL,
};
use kandev_registry::AgentRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTuiAgentRequest {
    pub display_name: String,
    pub model: String,
    pub command: Vec<String>,
    pub description: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomTuiError {
    #[error("slug derived from display name is empty")]
    InvalidSlug,
    #[error("command is required")]
    CommandRequired,
    #[error("agent {0} already exists")]
    AgentAlreadyExists(String),
    #[error("failed to persist agent: {0}")]
    PersistFailed(String),
}

/// Persists a custom-TUI agent's registry row and its default profile.
/// Implemented outside this crate against the real session store.
#[async_trait]
pub trait CustomTuiStore: Send + Sync {
    async fn agent_exists(&self, id: &AgentId) -> bool;
    async fn persist_agent(&self, agent: &Agent) -> Result<(), String>;
    async fn persist_profile(&self, profile: &AgentProfile) -> Result<(), String>;
}

/// Lowercase, map every run of non-ASCII-alphanumeric characters to a single
/// `-`, then trim leading/trailing `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_sep = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('-');
            last_was_sep = true;
        }
    }
    slug.trim_matches('-').to_string()
}

pub async fn register_custom_tui_agent(
    registry: &Arc<AgentRegistry>,
    store: &dyn CustomTuiStore,
    request: CustomTuiAgentRequest,
    now_ms: u64,
) -> Result<(Agent, AgentProfile), CustomTuiError> {
    let slug = slugify(&request.display_name);
    if slug.is_empty() {
        return Err(CustomTuiError::InvalidSlug);
    }
    if request.command.is_empty() || request.command.iter().all(|t| t.trim().is_empty()) {
        return Err(CustomTuiError::CommandRequired);
    }

    let id = AgentId::new(slug.clone());
    if registry.exists(&id) || store.agent_exists(&id).await {
        return Err(CustomTuiError::AgentAlreadyExists(slug));
    }

    let agent = Agent {
        id: id.clone(),
        name: slug.clone(),
        display_name: Some(request.display_name.clone()),
        enabled: true,
        display_order: i32::MAX,
        base_command: request.command,
        model_flag: None,
        default_model: None,
        capabilities: AgentCapabilities {
            supports_session_resume: false,
            supports_shell: false,
            workspace_only: false,
            supports_dynamic_models: false,
        },
        permissions: BTreeMap::new(),
        passthrough: Some(PassthroughConfig { command: vec![], prompt_flag: None }),
        logo: Logo::default(),
        supports_mcp: false,
        mcp_config_path: None,
    };

    let profile_name = if request.model.trim().is_empty() { request.display_name.clone() } else { request.model.clone() };
    let profile = AgentProfile {
        id: AgentProfileId::new(),
        agent_id: id.clone(),
        name: profile_name,
        agent_display_name: request.display_name.clone(),
        model: PASSTHROUGH_MODEL.to_string(),
        auto_approve: false,
        allow_indexing: true,
        dangerously_skip_permissions: false,
        cli_passthrough: true,
        user_modified: false,
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    };

    registry
        .register_custom_tui_agent(agent.clone())
        .map_err(|e| CustomTuiError::PersistFailed(e.to_string()))?;

    if let Err(err) = persist(store, &agent, &profile).await {
        let _ = registry.unregister(&id);
        return Err(CustomTuiError::PersistFailed(err));
    }

    Ok((agent, profile))
}

async fn persist(store: &dyn CustomTuiStore, agent: &Agent, profile: &AgentProfile) -> Result<(), String> {
    store.persist_agent(agent).await?;
    store.persist_profile(profile).await
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashSet;

    #[derive(Default)]
    pub struct FakeCustomTuiStore {
        pub existing: Mutex<HashSet<AgentId>>,
        pub fail_persist: Mutex<bool>,
        pub persisted_agents: Mutex<Vec<Agent>>,
        pub persisted_profiles: Mutex<Vec<AgentProfile>>,
    }

    #[async_trait]
    impl CustomTuiStore for FakeCustomTuiStore {
        async fn agent_exists(&self, id: &AgentId) -> bool {
            self.existing.lock().contains(id)
        }

        async fn persist_agent(&self, agent: &Agent) -> Result<(), String> {
            if *self.fail_persist.lock() {
                return Err("simulated failure".to_string());
            }
            self.persisted_agents.lock().push(agent.clone());
            Ok(())
        }

        async fn persist_profile(&self, profile: &AgentProfile) -> Result<(), String> {
            if *self.fail_persist.lock() {
                return Err("simulated failure".to_string());
            }
            self.persisted_profiles.lock().push(profile.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "custom_tui_tests.rs"]
mod tests;
