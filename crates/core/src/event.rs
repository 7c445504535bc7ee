// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized event model: the uniform shape every transport adapter
//! translates its own wire protocol into before handing events to the
//! executor's event bus.
//!
//! Events are small, immutable, and value-copied onto the channel; no event
//! variant holds a handle back into adapter-internal state.

use serde::{Deserialize, Serialize};

/// Identifies one tool invocation across its `tool_call` → `tool_update`
/// pair, so a UI can match a completion back to the call it completed.
pub type ToolCallId = String;

/// Status of a tool call's lifecycle, carried on `tool_update` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolUpdateStatus {
    Running,
    Complete,
    Error,
}

/// A single file mutation within a `modify_file` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileMutation {
    Patch { diff: String },
    Create { diff: String },
    Delete {},
}

/// Captured stdout and exit status of a `shell_exec` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    pub stdout: String,
    pub exit_code: i32,
}

/// Tagged union of the normalized shapes a tool call's detail can take.
/// Factory functions below are the only supported constructors, so `kind`
/// can never drift out of sync with the payload's own variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedPayload {
    ShellExec {
        command: Vec<String>,
        cwd: Option<String>,
        output: Option<ShellOutput>,
    },
    ModifyFile {
        path: String,
        mutations: Vec<FileMutation>,
    },
    Generic {
        tool: String,
        args: serde_json::Value,
        output: Option<serde_json::Value>,
    },
}

impl NormalizedPayload {
    pub fn new_shell_exec(command: Vec<String>, cwd: Option<String>) -> Self {
        Self::ShellExec { command, cwd, output: None }
    }

    pub fn new_modify_file(path: impl Into<String>, mutations: Vec<FileMutation>) -> Self {
        Self::ModifyFile { path: path.into(), mutations }
    }

    pub fn new_generic(tool: impl Into<String>, args: serde_json::Value) -> Self {
        Self::Generic { tool: tool.into(), args, output: None }
    }
}

/// A single plan step as reported by an agent's plan-update notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub step: String,
    pub status: String,
}

/// Token/context-window usage reported by an agent, when it exposes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindowStats {
    pub used_tokens: u64,
    pub max_tokens: u64,
}

impl ContextWindowStats {
    pub fn new(used_tokens: u64, max_tokens: u64) -> Self {
        Self { used_tokens, max_tokens }
    }

    /// Tokens left in the window, saturating at zero if usage somehow
    /// exceeds `max_tokens`.
    pub fn remaining(&self) -> u64 {
        self.max_tokens.saturating_sub(self.used_tokens)
    }

    /// Percentage of the window consumed, `used / max * 100`. `0.0` when
    /// `max_tokens` is zero rather than dividing by it.
    pub fn efficiency(&self) -> f64 {
        if self.max_tokens == 0 {
            return 0.0;
        }
        (self.used_tokens as f64 / self.max_tokens as f64) * 100.0
    }
}

/// Uniform event record a transport adapter emits onto the session event bus.
/// Every variant carries `session_id`; tool variants additionally carry
/// `tool_call_id` so updates can be joined back to their call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    MessageChunk {
        session_id: String,
        operation_id: String,
        text: String,
        /// Present for a `turn/diff/updated` chunk; absent for a plain text
        /// delta.
        diff: Option<String>,
    },
    Reasoning {
        session_id: String,
        operation_id: String,
        reasoning_text: String,
    },
    ToolCall {
        session_id: String,
        operation_id: String,
        tool_call_id: ToolCallId,
        payload: NormalizedPayload,
    },
    ToolUpdate {
        session_id: String,
        operation_id: String,
        tool_call_id: ToolCallId,
        status: ToolUpdateStatus,
        /// Present on `complete`/`error` as a fallback reconstitution of the
        /// full payload, in case the initial `tool_call` was never observed
        /// (e.g. after a resume).
        payload: Option<NormalizedPayload>,
    },
    Plan {
        session_id: String,
        operation_id: String,
        plan_entries: Vec<PlanEntry>,
    },
    ContextWindow {
        session_id: String,
        operation_id: String,
        stats: ContextWindowStats,
    },
    Error {
        session_id: String,
        operation_id: String,
        message: String,
    },
    Complete {
        session_id: String,
        operation_id: String,
    },
}

impl AgentEvent {
    pub fn session_id(&self) -> &str {
        match self {
            Self::MessageChunk { session_id, .. }
            | Self::Reasoning { session_id, .. }
            | Self::ToolCall { session_id, .. }
            | Self::ToolUpdate { session_id, .. }
            | Self::Plan { session_id, .. }
            | Self::ContextWindow { session_id, .. }
            | Self::Error { session_id, .. }
            | Self::Complete { session_id, .. } => session_id,
        }
    }

    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Self::ToolCall { tool_call_id, .. } | Self::ToolUpdate { tool_call_id, .. } => {
                Some(tool_call_id)
            }
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
