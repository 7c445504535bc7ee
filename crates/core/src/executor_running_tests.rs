// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> ExecutorRunning {
    ExecutorRunning {
        runtime: RuntimeKind::Local,
        status: ExecutionStatus::Running,
        resumable: true,
        agent_execution_id: "exec-1".to_string(),
        container_id: None,
        worktree_id: None,
        worktree_path: None,
        worktree_branch: None,
        resume_token: Some("rt-1".to_string()),
        last_message_uuid: None,
    }
}

#[test]
fn live_while_starting_or_running() {
    let mut e = sample();
    e.status = ExecutionStatus::Starting;
    assert!(e.is_live());
    e.status = ExecutionStatus::Exited;
    assert!(!e.is_live());
}

#[test]
fn resume_requires_token_and_flag() {
    let mut e = sample();
    assert!(e.can_resume());
    e.resume_token = None;
    assert!(!e.can_resume());
    e.resume_token = Some("rt-1".to_string());
    e.resumable = false;
    assert!(!e.can_resume());
}
