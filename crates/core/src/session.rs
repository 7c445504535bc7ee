// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task session: one conversation with one agent over one task.

use crate::profile::{AgentProfile, AgentProfileId};
use crate::task::TaskId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a task session.
    pub struct SessionId("ses-");
}

crate::define_id! {
    /// Unique identifier for a worktree attached to a session.
    pub struct WorktreeId("wkt-");
}

/// Lifecycle state of a task session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Created,
    Starting,
    Running,
    WaitingForInput,
    Completed,
    Failed,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

crate::simple_display! {
    SessionState {
        Created => "created",
        Starting => "starting",
        Running => "running",
        WaitingForInput => "waiting_for_input",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// A git worktree attached to a session. A session may hold several (one
/// per repository, for multi-repo tasks); `position == 0` is primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSessionWorktree {
    pub session_id: SessionId,
    pub worktree_id: WorktreeId,
    pub repository_id: String,
    pub position: u32,
    pub path: std::path::PathBuf,
    pub branch: String,
}

impl TaskSessionWorktree {
    pub fn is_primary(&self) -> bool {
        self.position == 0
    }
}

/// One conversation with one agent over one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSession {
    pub id: SessionId,
    pub task_id: TaskId,
    pub agent_profile_id: AgentProfileId,
    pub repository_id: Option<String>,
    pub base_branch: Option<String>,
    pub state: SessionState,
    /// Link to the live workspace/subprocess handle; `None` until launched.
    pub agent_execution_id: Option<String>,
    pub container_id: Option<String>,
    pub error_message: Option<String>,
    /// Immutable copy of the profile at session-creation time, so mid-session
    /// profile edits never mutate history.
    pub agent_profile_snapshot: AgentProfile,
    pub executor_id: Option<String>,
    pub executor_profile_id: Option<String>,
    pub workflow_step_id: Option<String>,
    pub is_primary: bool,
    pub is_passthrough: bool,
    pub started_at_ms: u64,
    pub updated_at_ms: u64,
    pub completed_at_ms: Option<u64>,
    pub worktrees: Vec<TaskSessionWorktree>,
}

impl TaskSession {
    pub fn primary_worktree(&self) -> Option<&TaskSessionWorktree> {
        self.worktrees.iter().find(|w| w.is_primary())
    }

    /// True once the executor has handed back a live execution handle.
    pub fn has_live_execution(&self) -> bool {
        self.agent_execution_id.is_some()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
