// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use kandev_core::AgentId;

/// Fetches a live model list from an agent that advertises
/// `supports_dynamic_models`. Implemented outside this crate (it speaks the
/// agent's own discovery RPC).
#[async_trait]
pub trait DynamicModelsProvider: Send + Sync {
    async fn list_models(&self, agent_id: &AgentId) -> Result<Vec<String>, String>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeDynamicModelsProvider {
        pub results: Mutex<HashMap<AgentId, Result<Vec<String>, String>>>,
    }

    #[async_trait]
    impl DynamicModelsProvider for FakeDynamicModelsProvider {
        async fn list_models(&self, agent_id: &AgentId) -> Result<Vec<String>, String> {
            self.results
                .lock()
                .get(agent_id)
                .cloned()
                .unwrap_or_else(|| Err(format!("no canned models for {agent_id}")))
        }
    }
}
