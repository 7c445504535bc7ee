// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent profile: a user-configurable preset binding an agent to a model and
//! a set of permission/passthrough settings.

use crate::agent::{AgentId, PASSTHROUGH_MODEL};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for an agent profile.
    pub struct AgentProfileId("apr-");
}

/// A saved preset: which agent, which model, and how permissive it is.
///
/// Invariant: `model` is non-empty unless the agent is passthrough-only, in
/// which case `model` holds the sentinel [`PASSTHROUGH_MODEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentProfileId,
    pub agent_id: AgentId,
    pub name: String,
    /// Snapshot of the agent's display name at the time this profile was
    /// last synced, so listing a profile doesn't require a registry lookup.
    pub agent_display_name: String,
    pub model: String,
    pub auto_approve: bool,
    pub allow_indexing: bool,
    pub dangerously_skip_permissions: bool,
    pub cli_passthrough: bool,
    /// Once true, the profile-sync pass (§4.E) never touches this row again.
    pub user_modified: bool,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl AgentProfile {
    /// True when `model` holds the passthrough sentinel.
    pub fn is_passthrough_model(&self) -> bool {
        self.model == PASSTHROUGH_MODEL
    }

    /// Validate the model-non-empty invariant.
    pub fn has_valid_model(&self) -> bool {
        !self.model.is_empty()
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
