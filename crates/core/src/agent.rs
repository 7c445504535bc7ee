// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent registry entry types.
//!
//! `AgentId` is a stable human-chosen slug (`"codex"`, `"claude-code"`), distinct
//! from `SessionId` (one conversation) and `ExecutorRunning::agent_execution_id`
//! (the live subprocess handle). An `Agent` describes how to run one kind of
//! coding assistant; it is registered once at startup and consulted by every
//! session the settings controller and executor create.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier for a registered agent kind (e.g. `"codex"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for AgentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AgentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AgentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Sentinel model value for agents that run entirely through their own TUI/CLI
/// and never receive a model name from the host.
pub const PASSTHROUGH_MODEL: &str = "passthrough";

/// Fixed capability set an agent may advertise.
///
/// Modeled as a flag struct rather than a trait-object hierarchy: capabilities
/// are a closed, small vocabulary, and every consumer needs to check all of
/// them, so a struct of bools is cheaper to reason about than subclassing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// Agent can resume a prior conversation via a resume token / session id.
    pub supports_session_resume: bool,
    /// Agent can execute shell commands as part of its tool calls.
    pub supports_shell: bool,
    /// Agent only operates within the given workspace; cannot reach outside it.
    pub workspace_only: bool,
    /// Agent exposes a live model list via a discovery RPC.
    pub supports_dynamic_models: bool,
}

/// How a permission setting is applied when building a CLI invocation.
///
/// Currently only `CliFlag` is implemented; the enum stays open so a future
/// transport (e.g. ACP, which negotiates permissions over the wire instead of
/// flags) can add a variant without reshaping every profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMethod {
    CliFlag,
}

/// A single permission toggle an agent exposes (e.g. "auto approve edits").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSetting {
    pub supported: bool,
    pub default: bool,
    pub label: String,
    pub description: String,
    pub apply_method: ApplyMethod,
    /// CLI flag to append when this setting is enabled, e.g. `"--auto-approve"`.
    pub cli_flag: String,
    /// Fixed value to pair with `cli_flag`, if the flag takes one (`"--mode";
    /// value "yolo"` vs. a bare boolean flag).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_flag_value: Option<String>,
}

/// Light/dark logo asset paths, or absent for agents with no branding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logo {
    pub light: Option<String>,
    pub dark: Option<String>,
}

/// Command template for an agent that runs entirely through its own CLI/TUI
/// (the host never speaks the agent's wire protocol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassthroughConfig {
    /// Base command + args, e.g. `["claude"]`.
    pub command: Vec<String>,
    /// Flag template for passing the initial prompt, with `{prompt}` as the
    /// substitution point. `None` means the prompt is appended as a bare
    /// trailing argument instead.
    #[serde(default)]
    pub prompt_flag: Option<Vec<String>>,
}

/// A registered agent kind: the static description the settings controller
/// and executor consult to turn an `agent_id` into a runnable command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Raw/internal name, always present.
    pub name: String,
    /// Human-facing name; falls back to `name` when unset.
    #[serde(default)]
    pub display_name: Option<String>,
    pub enabled: bool,
    pub display_order: i32,
    /// Base command + args before model/permission flags are appended.
    pub base_command: Vec<String>,
    /// Flag template for the model, with `{model}` as the substitution point.
    #[serde(default)]
    pub model_flag: Option<Vec<String>>,
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    #[serde(default)]
    pub permissions: BTreeMap<String, PermissionSetting>,
    #[serde(default)]
    pub passthrough: Option<PassthroughConfig>,
    #[serde(default)]
    pub logo: Logo,
    /// Whether this agent exposes an MCP server config file to merge policy into.
    #[serde(default)]
    pub supports_mcp: bool,
    #[serde(default)]
    pub mcp_config_path: Option<String>,
}

impl Agent {
    /// Resolved display name: `display_name`, falling back to `name`.
    pub fn resolved_display_name(&self) -> &str {
        self.display_name.as_deref().filter(|s| !s.is_empty()).unwrap_or(&self.name)
    }

    /// True when this agent has no wire transport of its own and only runs
    /// via `passthrough`, with no usable default model.
    pub fn is_passthrough_only(&self) -> bool {
        self.passthrough.is_some() && self.default_model.is_none()
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
