// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kandev_core::{Agent, AgentId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("agent {0} already registered")]
    AlreadyRegistered(String),
    #[error("agent {0} not found")]
    NotFound(String),
}

/// Process-lifetime map of registered agent kinds. Loaded at startup from
/// static definitions plus persisted custom-TUI registrations; mutated only
/// through [`Self::register`]/[`Self::unregister`].
#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<BTreeMap<AgentId, Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects registration into an already-present slug.
    pub fn register(&self, agent: Agent) -> Result<(), RegistryError> {
        let mut agents = self.agents.write();
        if agents.contains_key(&agent.id) {
            return Err(RegistryError::AlreadyRegistered(agent.id.to_string()));
        }
        agents.insert(agent.id.clone(), agent);
        Ok(())
    }

    /// Registers a custom-TUI agent the same way as any other agent; the
    /// distinction (passthrough-only, no wire transport) lives in the
    /// `Agent` value itself, not in a separate storage path.
    pub fn register_custom_tui_agent(&self, agent: Agent) -> Result<(), RegistryError> {
        self.register(agent)
    }

    pub fn unregister(&self, id: &AgentId) -> Result<(), RegistryError> {
        self.agents.write().remove(id).map(|_| ()).ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn get(&self, id: &AgentId) -> Option<Agent> {
        self.agents.read().get(id).cloned()
    }

    pub fn exists(&self, id: &AgentId) -> bool {
        self.agents.read().contains_key(id)
    }

    /// Enabled agents, ordered by `display_order` then id.
    pub fn list_enabled(&self) -> Vec<Agent> {
        let mut enabled: Vec<Agent> = self.agents.read().values().filter(|a| a.enabled).cloned().collect();
        enabled.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.id.as_str().cmp(b.id.as_str())));
        enabled
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
