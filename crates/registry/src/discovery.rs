// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery availability: whether a registered agent's binary is actually
//! present on the host, probed through an injected collaborator so the
//! registry itself never shells out.

use async_trait::async_trait;
use kandev_core::AgentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRecord {
    pub agent_id: AgentId,
    pub available: bool,
    pub detail: Option<String>,
}

/// Probes whether an agent's CLI/binary is reachable. Implemented outside
/// this crate (it touches the filesystem/`$PATH`); the registry only
/// consumes results and force-marks `mock-agent` available when enabled.
#[async_trait]
pub trait DiscoveryCollaborator: Send + Sync {
    async fn detect_agents(&self, candidates: &[AgentId]) -> Vec<DiscoveryRecord>;
    async fn invalidate(&self, agent_id: &AgentId);
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Returns canned availability per agent id; any agent absent from the
    /// map is reported unavailable.
    #[derive(Default)]
    pub struct FakeDiscoveryCollaborator {
        pub available: Mutex<HashMap<AgentId, bool>>,
        pub invalidated: Mutex<Vec<AgentId>>,
    }

    #[async_trait]
    impl DiscoveryCollaborator for FakeDiscoveryCollaborator {
        async fn detect_agents(&self, candidates: &[AgentId]) -> Vec<DiscoveryRecord> {
            let available = self.available.lock();
            candidates
                .iter()
                .map(|id| DiscoveryRecord {
                    agent_id: id.clone(),
                    available: available.get(id).copied().unwrap_or(false),
                    detail: None,
                })
                .collect()
        }

        async fn invalidate(&self, agent_id: &AgentId) {
            self.invalidated.lock().push(agent_id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::FakeDiscoveryCollaborator;
    use super::*;

    #[tokio::test]
    async fn unlisted_agents_are_reported_unavailable() {
        let collaborator = FakeDiscoveryCollaborator::default();
        collaborator.available.lock().insert(AgentId::new("codex"), true);

        let records = collaborator
            .detect_agents(&[AgentId::new("codex"), AgentId::new("unknown")])
            .await;

        assert!(records.iter().find(|r| r.agent_id == AgentId::new("codex")).unwrap().available);
        assert!(!records.iter().find(|r| r.agent_id == AgentId::new("unknown")).unwrap().available);
    }

    #[tokio::test]
    async fn invalidate_is_recorded() {
        let collaborator = FakeDiscoveryCollaborator::default();
        collaborator.invalidate(&AgentId::new("codex")).await;
        assert_eq!(collaborator.invalidated.lock().as_slice(), [AgentId::new("codex")]);
    }
}
