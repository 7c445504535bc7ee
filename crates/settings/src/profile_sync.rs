// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `EnsureInitialAgentProfiles`: keeps each available agent's profile rows in
//! sync with its current registry config, without touching anything a user
//! has hand-edited.

use crate::available::AgentAvailability;
use async_trait::async_trait;
use kandev_core::{AgentId, AgentProfile, AgentProfileId, PASSTHROUGH_MODEL};
use kandev_registry::AgentRegistry;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileSyncError {
    #[error("agent {0} has no display name")]
    EmptyDisplayName(AgentId),
    #[error("agent {0} has no default model and is not passthrough-only")]
    ModelRequired(AgentId),
    #[error("failed to upsert agent {0}: {1}")]
    UpsertFailed(AgentId, String),
    #[error("failed to save profile for agent {0}: {1}")]
    SaveFailed(AgentId, String),
}

/// What happened to one agent's profiles during a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSyncOutcome {
    Created(AgentProfile),
    Updated(Vec<AgentProfile>),
    Unchanged,
}

/// Backing store for the agent row and its profiles. Implemented outside
/// this crate against the real session store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn upsert_agent(&self, agent: &kandev_core::Agent) -> Result<(), String>;
    async fn list_profiles(&self, agent_id: &AgentId) -> Vec<AgentProfile>;
    async fn save_profile(&self, profile: &AgentProfile) -> Result<(), String>;
}

pub async fn ensure_initial_agent_profiles(
    registry: &AgentRegistry,
    availability: &AgentAvailability,
    store: &dyn ProfileStore,
    now_ms: u64,
) -> Result<Vec<ProfileSyncOutcome>, ProfileSyncError> {
    let mut outcomes = Vec::new();

    for record in availability.list_available_agents(now_ms).await {
        if !record.available {
            continue;
        }
        let Some(agent) = registry.get(&record.id) else { continue };

        let display_name = agent.resolved_display_name().to_string();
        if display_name.trim().is_empty() {
            return Err(ProfileSyncError::EmptyDisplayName(agent.id.clone()));
        }

        let is_passthrough_only = agent.is_passthrough_only();
        let model = if is_passthrough_only {
            PASSTHROUGH_MODEL.to_string()
        } else {
            agent.default_model.clone().ok_or_else(|| ProfileSyncError::ModelRequired(agent.id.clone()))?
        };

        store
            .upsert_agent(&agent)
            .await
            .map_err(|e| ProfileSyncError::UpsertFailed(agent.id.clone(), e))?;

        let existing = store.list_profiles(&agent.id).await;
        if existing.is_empty() {
            let profile_name = if is_passthrough_only {
                display_name.clone()
            } else {
                resolve_model_display_name(&record.models, &model)
            };
            let profile = default_profile(&agent, &display_name, &model, &profile_name, now_ms);
            store
                .save_profile(&profile)
                .await
                .map_err(|e| ProfileSyncError::SaveFailed(agent.id.clone(), e))?;
            outcomes.push(ProfileSyncOutcome::Created(profile));
            continue;
        }

        let mut updated = Vec::new();
        for mut profile in existing {
            if profile.user_modified {
                continue;
            }
            let profile_name = if is_passthrough_only {
                display_name.clone()
            } else {
                resolve_model_display_name(&record.models, &model)
            };
            let before = profile.clone();
            profile.name = profile_name;
            profile.agent_display_name = display_name.clone();
            profile.model = model.clone();
            profile.auto_approve = agent.permissions.get("auto_approve").map(|p| p.default).unwrap_or(profile.auto_approve);
            profile.allow_indexing =
                agent.permissions.get("allow_indexing").map(|p| p.default).unwrap_or(profile.allow_indexing);
            profile.dangerously_skip_permissions = agent
                .permissions
                .get("dangerously_skip_permissions")
                .map(|p| p.default)
                .unwrap_or(profile.dangerously_skip_permissions);
            profile.cli_passthrough = agent.passthrough.is_some() && is_passthrough_only;

            if profile == before {
                continue;
            }
            profile.updated_at_ms = now_ms;
            store
                .save_profile(&profile)
                .await
                .map_err(|e| ProfileSyncError::SaveFailed(agent.id.clone(), e))?;
            updated.push(profile);
        }

        outcomes.push(if updated.is_empty() { ProfileSyncOutcome::Unchanged } else { ProfileSyncOutcome::Updated(updated) });
    }

    Ok(outcomes)
}

fn resolve_model_display_name(models: &[String], model_id: &str) -> String {
    models.iter().find(|m| m.as_str() == model_id).cloned().unwrap_or_else(|| model_id.to_string())
}

fn default_profile(
    agent: &kandev_core::Agent,
    display_name: &str,
    model: &str,
    profile_name: &str,
    now_ms: u64,
) -> AgentProfile {
    AgentProfile {
        id: AgentProfileId::new(),
        agent_id: agent.id.clone(),
        name: profile_name.to_string(),
        agent_display_name: display_name.to_string(),
        model: model.to_string(),
        auto_approve: agent.permissions.get("auto_approve").map(|p| p.default).unwrap_or(false),
        allow_indexing: agent.permissions.get("allow_indexing").map(|p| p.default).unwrap_or(true),
        dangerously_skip_permissions: agent
            .permissions
            .get("dangerously_skip_permissions")
            .map(|p| p.default)
            .unwrap_or(false),
        cli_passthrough: agent.is_passthrough_only(),
        user_modified: false,
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeProfileStore {
        pub agents: Mutex<HashMap<AgentId, kandev_core::Agent>>,
        pub profiles: Mutex<HashMap<AgentId, Vec<AgentProfile>>>,
    }

    #[async_trait]
    impl ProfileStore for FakeProfileStore {
        async fn upsert_agent(&self, agent: &kandev_core::Agent) -> Result<(), String> {
            self.agents.lock().insert(agent.id.clone(), agent.clone());
            Ok(())
        }

        async fn list_profiles(&self, agent_id: &AgentId) -> Vec<AgentProfile> {
            self.profiles.lock().get(agent_id).cloned().unwrap_or_default()
        }

        async fn save_profile(&self, profile: &AgentProfile) -> Result<(), String> {
            let mut profiles = self.profiles.lock();
            let entry = profiles.entry(profile.agent_id.clone()).or_default();
            if let Some(existing) = entry.iter_mut().find(|p| p.id == profile.id) {
                *existing = profile.clone();
            } else {
                entry.push(profile.clone());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "profile_sync_tests.rs"]
mod tests;
