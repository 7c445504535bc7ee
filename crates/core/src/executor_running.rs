// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The live execution record: what the executor hands back once a session's
//! subprocess (or container) is actually running.

use serde::{Deserialize, Serialize};

/// Where a session's agent subprocess actually runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeKind {
    Local,
    Worktree,
    RemoteDocker,
}

crate::simple_display! {
    RuntimeKind {
        Local => "local",
        Worktree => "worktree",
        RemoteDocker => "remote_docker",
    }
}

/// Status of a live execution, distinct from [`crate::session::SessionState`]:
/// this tracks the subprocess/container, not the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Starting,
    Running,
    Exited,
    Crashed,
}

crate::simple_display! {
    ExecutionStatus {
        Starting => "starting",
        Running => "running",
        Exited => "exited",
        Crashed => "crashed",
    }
}

/// The handle an executor returns once a session has a live subprocess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorRunning {
    pub runtime: RuntimeKind,
    pub status: ExecutionStatus,
    /// Whether this execution can be resumed after a restart (the agent
    /// supports `resume_token` and the executor kept the session's state dir).
    pub resumable: bool,
    pub agent_execution_id: String,
    pub container_id: Option<String>,
    pub worktree_id: Option<String>,
    pub worktree_path: Option<std::path::PathBuf>,
    pub worktree_branch: Option<String>,
    /// Opaque token the transport adapter uses to resume the agent's own
    /// conversation state; `None` for agents without `supports_session_resume`.
    pub resume_token: Option<String>,
    /// UUID of the last message observed, used to detect duplicate replay on
    /// resume.
    pub last_message_uuid: Option<String>,
}

impl ExecutorRunning {
    pub fn is_live(&self) -> bool {
        matches!(self.status, ExecutionStatus::Starting | ExecutionStatus::Running)
    }

    pub fn can_resume(&self) -> bool {
        self.resumable && self.resume_token.is_some()
    }
}

#[cfg(test)]
#[path = "executor_running_tests.rs"]
mod tests;
