// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Probes `$PATH` for each candidate agent's binary. The candidate's id is
//! taken as the command name by convention (registered agent ids match their
//! CLI's binary name, e.g. `"codex"`).

use async_trait::async_trait;
use kandev_core::AgentId;
use kandev_registry::{DiscoveryCollaborator, DiscoveryRecord};

#[derive(Debug, Default)]
pub struct PathDiscoveryCollaborator;

#[async_trait]
impl DiscoveryCollaborator for PathDiscoveryCollaborator {
    async fn detect_agents(&self, candidates: &[AgentId]) -> Vec<DiscoveryRecord> {
        candidates
            .iter()
            .map(|id| match which::which(id.as_str()) {
                Ok(path) => DiscoveryRecord { agent_id: id.clone(), available: true, detail: Some(path.display().to_string()) },
                Err(err) => DiscoveryRecord { agent_id: id.clone(), available: false, detail: Some(err.to_string()) },
            })
            .collect()
    }

    async fn invalidate(&self, _agent_id: &AgentId) {
        // No cache to invalidate: every call re-scans $PATH.
    }
}
