// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task: the unit of work a session is launched to pursue.
//!
//! Not present in the distilled component list but required by it: every
//! `TaskSession` belongs to a `Task`, and the executor's `StopByTaskID`
//! operation needs a stable id to group sessions by.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a task.
    pub struct TaskId("tsk-");
}

/// Lifecycle state of a task, independent of any one session's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Queued,
    InProgress,
    Review,
    Failed,
    Done,
}

crate::simple_display! {
    TaskState {
        Queued => "queued",
        InProgress => "in_progress",
        Review => "review",
        Failed => "failed",
        Done => "done",
    }
}

/// A unit of work: a description plus bookkeeping for the sessions launched
/// against it. Sessions hold the agent/model/executor detail; the task holds
/// only what's common across however many sessions attempt it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub repository_id: Option<String>,
    pub title: String,
    /// The session currently considered authoritative for this task, e.g.
    /// the one whose diff would be presented for review.
    pub primary_session_id: Option<String>,
    pub state: TaskState,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl Task {
    pub fn is_open(&self) -> bool {
        matches!(self.state, TaskState::Queued | TaskState::InProgress | TaskState::Review)
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
