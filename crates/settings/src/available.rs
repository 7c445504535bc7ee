// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery and availability: which registered agents are actually usable
//! right now, enriched with the detail a settings UI would show.

use kandev_core::{AgentCapabilities, PermissionSetting};
use kandev_registry::{AgentRegistry, DiscoveryCollaborator, DiscoveryRecord, ModelCache};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

const MOCK_AGENT_ID: &str = "mock-agent";
const MODEL_CACHE_TTL: Duration = Duration::from_secs(300);

/// Raw availability, one row per candidate agent — what `ListDiscovery`
/// returns.
pub type ListDiscovery = Vec<DiscoveryRecord>;

/// An available agent enriched with everything a settings UI needs to
/// render it, plus the timestamp this snapshot was computed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableAgent {
    pub id: kandev_core::AgentId,
    pub display_name: String,
    pub capabilities: AgentCapabilities,
    pub models: Vec<String>,
    pub permissions: BTreeMap<String, PermissionSetting>,
    pub is_passthrough: bool,
    pub available: bool,
    pub checked_at_ms: u64,
}

pub type ListAvailableAgents = Vec<AvailableAgent>;

pub struct AgentAvailability {
    registry: Arc<AgentRegistry>,
    discovery: Arc<dyn DiscoveryCollaborator>,
    model_cache: Arc<ModelCache>,
}

impl AgentAvailability {
    pub fn new(registry: Arc<AgentRegistry>, discovery: Arc<dyn DiscoveryCollaborator>, model_cache: Arc<ModelCache>) -> Self {
        Self { registry, discovery, model_cache }
    }

    async fn detect(&self) -> ListDiscovery {
        let candidates: Vec<_> = self.registry.list_enabled().into_iter().map(|a| a.id).collect();
        let mut records = self.discovery.detect_agents(&candidates).await;
        if let Some(mock) = self.registry.get(&kandev_core::AgentId::new(MOCK_AGENT_ID)) {
            if mock.enabled {
                if let Some(record) = records.iter_mut().find(|r| r.agent_id.as_str() == MOCK_AGENT_ID) {
                    record.available = true;
                } else {
                    records.push(DiscoveryRecord {
                        agent_id: mock.id,
                        available: true,
                        detail: Some("forced available: mock agent".to_string()),
                    });
                }
            }
        }
        records
    }

    pub async fn list_discovery(&self) -> ListDiscovery {
        self.detect().await
    }

    pub async fn list_available_agents(&self, now_ms: u64) -> ListAvailableAgents {
        let records = self.detect().await;
        records
            .into_iter()
            .filter_map(|record| {
                let agent = self.registry.get(&record.agent_id)?;
                let models = self
                    .model_cache
                    .get_usable(&agent.id, now_ms, MODEL_CACHE_TTL)
                    .map(|entry| entry.models)
                    .unwrap_or_default();
                Some(AvailableAgent {
                    id: agent.id,
                    display_name: agent.resolved_display_name().to_string(),
                    capabilities: agent.capabilities,
                    models,
                    permissions: agent.permissions,
                    is_passthrough: agent.passthrough.is_some(),
                    available: record.available,
                    checked_at_ms: now_ms,
                })
            })
            .collect()
    }

    pub async fn invalidate_discovery_cache(&self, agent_id: &kandev_core::AgentId) {
        self.discovery.invalidate(agent_id).await;
    }
}

#[cfg(test)]
#[path = "available_tests.rs"]
mod tests;
