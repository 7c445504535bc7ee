// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kandev_core::collab::CollabError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("agent_profile_id is required to prepare a session")]
    AgentProfileRequired,
    #[error("session {0} not found")]
    SessionNotFound(String),
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("session {0} has no running execution")]
    ExecutionNotFound(String),
    #[error("session {0} already has a live execution")]
    AlreadyRunning(String),
    #[error("remote_docker launch requires a resolvable clone URL")]
    RemoteDockerNoRepoUrl,
    #[error(transparent)]
    Collab(#[from] CollabError),
}
