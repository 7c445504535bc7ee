// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator traits: the narrow interfaces the executor and transport
//! adapter consume from the rest of the host (agent manager, board/workflow
//! service, secrets, shell preferences) without depending on their concrete
//! implementations. Each trait ships a `test-support`-gated fake so
//! `kandev-executor` and `kandev-transport` are unit-testable without a real
//! daemon, database, or subprocess.

use crate::executor_running::ExecutorRunning;
use crate::session::TaskSession;
use crate::task::Task;
use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollabError {
    #[error("agent manager: {0}")]
    AgentManager(String),
    #[error("repository lookup failed: {0}")]
    Repository(String),
    #[error("secret {secret_id} not found")]
    SecretNotFound { secret_id: String },
    #[error("no shell preference configured")]
    NoShellPreference,
}

/// Parameters the executor hands the agent manager to launch (or restart) a
/// session's subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchAgentRequest {
    pub session_id: String,
    pub executor_id: String,
    pub setup_script: Option<String>,
    pub worktree_path: Option<String>,
    pub worktree_branch: Option<String>,
    pub clone_url: Option<String>,
    pub env: Vec<(String, String)>,
    /// Carried forward from a prior `ExecutorRunning::resume_token`; `None`
    /// for a first launch.
    pub resume_token: Option<String>,
    /// Set only by `SwitchModel`, otherwise `None` (use the profile's model).
    pub model_override: Option<String>,
    /// Initial prompt to auto-send once the agent connects; cleared on
    /// resume so reconnecting never re-sends a stale prompt.
    pub task_description: Option<String>,
}

/// Bridge to the process that actually owns agent subprocesses/containers.
#[async_trait]
pub trait AgentManagerClient: Send + Sync {
    async fn launch_agent(&self, req: LaunchAgentRequest) -> Result<ExecutorRunning, CollabError>;
    async fn start_agent_process(&self, session_id: &str) -> Result<(), CollabError>;
    async fn stop_agent(&self, session_id: &str) -> Result<(), CollabError>;
    async fn stop_agent_with_reason(&self, session_id: &str, reason: &str) -> Result<(), CollabError>;
    async fn prompt_agent(&self, session_id: &str, prompt: &str) -> Result<(), CollabError>;
    async fn cancel_agent(&self, session_id: &str) -> Result<(), CollabError>;
    async fn respond_to_permission_by_session_id(
        &self,
        session_id: &str,
        tool_call_id: &str,
        option_id: &str,
        cancelled: bool,
    ) -> Result<(), CollabError>;
    async fn is_agent_running_for_session(&self, session_id: &str) -> Result<bool, CollabError>;
    async fn set_execution_description(&self, session_id: &str, description: &str) -> Result<(), CollabError>;
    async fn restart_agent_process(&self, session_id: &str) -> Result<(), CollabError>;
    async fn is_passthrough_session(&self, session_id: &str) -> Result<bool, CollabError>;
    async fn cleanup_stale_execution_by_session_id(&self, session_id: &str) -> Result<(), CollabError>;
}

/// Narrow persistence surface the executor needs: tasks, sessions (with
/// worktrees), and executor-running records. Broader board/workflow CRUD is
/// out of scope; this trait only covers what the executor's own state
/// machine reads and writes.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_task(&self, task_id: &str) -> Result<Task, CollabError>;
    async fn save_task(&self, task: &Task) -> Result<(), CollabError>;
    async fn get_session(&self, session_id: &str) -> Result<TaskSession, CollabError>;
    async fn save_session(&self, session: &TaskSession) -> Result<(), CollabError>;
    /// All sessions belonging to `task_id`, for primary-flag bookkeeping and
    /// `StopByTaskID`-style fan-out.
    async fn list_sessions_for_task(&self, task_id: &str) -> Result<Vec<TaskSession>, CollabError>;
    async fn get_executor_running(&self, session_id: &str) -> Result<Option<ExecutorRunning>, CollabError>;
    async fn save_executor_running(
        &self,
        session_id: &str,
        running: &ExecutorRunning,
    ) -> Result<(), CollabError>;
}

/// Resolves the shell a freshly-launched local/worktree subprocess should
/// run under.
#[async_trait]
pub trait ShellPreferenceProvider: Send + Sync {
    async fn preferred_shell(&self) -> Result<String, CollabError>;
}

/// Reveals secret material (e.g. a git credential) by opaque id.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn reveal(&self, secret_id: &str) -> Result<String, CollabError>;
}

/// Recent subprocess stderr, for the rate-limit-extraction fallback path.
#[async_trait]
pub trait StderrProvider: Send + Sync {
    async fn get_recent_stderr(&self) -> Result<Vec<String>, CollabError>;
}

/// Desktop toast notification. Failures are logged by the implementation and
/// never propagated — a missed notification must not fail the state
/// transition that triggered it.
#[async_trait]
pub trait NotifyProvider: Send + Sync {
    async fn notify(&self, title: &str, message: &str);
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;
    use std::collections::{HashMap, VecDeque};

    /// In-memory `AgentManagerClient` that records every call it receives
    /// and returns canned results, so executor tests can assert on call
    /// sequences without a real subprocess. `launch_results` is a queue so a
    /// test can script a failing call followed by a retry's success.
    #[derive(Default)]
    pub struct FakeAgentManagerClient {
        pub launch_results: Mutex<VecDeque<Result<ExecutorRunning, String>>>,
        pub calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AgentManagerClient for FakeAgentManagerClient {
        async fn launch_agent(&self, req: LaunchAgentRequest) -> Result<ExecutorRunning, CollabError> {
            self.calls.lock().push(format!("launch_agent:{}", req.session_id));
            match self.launch_results.lock().pop_front() {
                Some(Ok(running)) => Ok(running),
                Some(Err(msg)) => Err(CollabError::AgentManager(msg)),
                None => Err(CollabError::AgentManager("no canned result queued".to_string())),
            }
        }

        async fn start_agent_process(&self, session_id: &str) -> Result<(), CollabError> {
            self.calls.lock().push(format!("start_agent_process:{session_id}"));
            Ok(())
        }

        async fn stop_agent(&self, session_id: &str) -> Result<(), CollabError> {
            self.calls.lock().push(format!("stop_agent:{session_id}"));
            Ok(())
        }

        async fn stop_agent_with_reason(&self, session_id: &str, reason: &str) -> Result<(), CollabError> {
            self.calls.lock().push(format!("stop_agent_with_reason:{session_id}:{reason}"));
            Ok(())
        }

        async fn prompt_agent(&self, session_id: &str, prompt: &str) -> Result<(), CollabError> {
            self.calls.lock().push(format!("prompt_agent:{session_id}:{prompt}"));
            Ok(())
        }

        async fn cancel_agent(&self, session_id: &str) -> Result<(), CollabError> {
            self.calls.lock().push(format!("cancel_agent:{session_id}"));
            Ok(())
        }

        async fn respond_to_permission_by_session_id(
            &self,
            session_id: &str,
            tool_call_id: &str,
            option_id: &str,
            cancelled: bool,
        ) -> Result<(), CollabError> {
            self.calls.lock().push(format!(
                "respond_to_permission:{session_id}:{tool_call_id}:{option_id}:{cancelled}"
            ));
            Ok(())
        }

        async fn is_agent_running_for_session(&self, _session_id: &str) -> Result<bool, CollabError> {
            Ok(false)
        }

        async fn set_execution_description(&self, session_id: &str, description: &str) -> Result<(), CollabError> {
            self.calls.lock().push(format!("set_execution_description:{session_id}:{description}"));
            Ok(())
        }

        async fn restart_agent_process(&self, session_id: &str) -> Result<(), CollabError> {
            self.calls.lock().push(format!("restart_agent_process:{session_id}"));
            Ok(())
        }

        async fn is_passthrough_session(&self, _session_id: &str) -> Result<bool, CollabError> {
            Ok(false)
        }

        async fn cleanup_stale_execution_by_session_id(&self, session_id: &str) -> Result<(), CollabError> {
            self.calls.lock().push(format!("cleanup_stale_execution:{session_id}"));
            Ok(())
        }
    }

    /// In-memory `Repository` backed by hash maps, keyed by id.
    #[derive(Default)]
    pub struct FakeRepository {
        pub tasks: Mutex<HashMap<String, Task>>,
        pub sessions: Mutex<HashMap<String, TaskSession>>,
        pub running: Mutex<HashMap<String, ExecutorRunning>>,
    }

    #[async_trait]
    impl Repository for FakeRepository {
        async fn get_task(&self, task_id: &str) -> Result<Task, CollabError> {
            self.tasks
                .lock()
                .get(task_id)
                .cloned()
                .ok_or_else(|| CollabError::Repository(format!("no task {task_id}")))
        }

        async fn save_task(&self, task: &Task) -> Result<(), CollabError> {
            self.tasks.lock().insert(task.id.to_string(), task.clone());
            Ok(())
        }

        async fn get_session(&self, session_id: &str) -> Result<TaskSession, CollabError> {
            self.sessions
                .lock()
                .get(session_id)
                .cloned()
                .ok_or_else(|| CollabError::Repository(format!("no session {session_id}")))
        }

        async fn save_session(&self, session: &TaskSession) -> Result<(), CollabError> {
            self.sessions.lock().insert(session.id.to_string(), session.clone());
            Ok(())
        }

        async fn list_sessions_for_task(&self, task_id: &str) -> Result<Vec<TaskSession>, CollabError> {
            Ok(self.sessions.lock().values().filter(|s| s.task_id.as_str() == task_id).cloned().collect())
        }

        async fn get_executor_running(
            &self,
            session_id: &str,
        ) -> Result<Option<ExecutorRunning>, CollabError> {
            Ok(self.running.lock().get(session_id).cloned())
        }

        async fn save_executor_running(
            &self,
            session_id: &str,
            running: &ExecutorRunning,
        ) -> Result<(), CollabError> {
            self.running.lock().insert(session_id.to_string(), running.clone());
            Ok(())
        }
    }

    /// Always reports `/bin/bash`, unless overridden.
    pub struct FakeShellPreferenceProvider(pub String);

    impl Default for FakeShellPreferenceProvider {
        fn default() -> Self {
            Self("/bin/bash".to_string())
        }
    }

    #[async_trait]
    impl ShellPreferenceProvider for FakeShellPreferenceProvider {
        async fn preferred_shell(&self) -> Result<String, CollabError> {
            Ok(self.0.clone())
        }
    }

    /// In-memory secret map for tests.
    #[derive(Default)]
    pub struct FakeSecretStore(pub Mutex<HashMap<String, String>>);

    #[async_trait]
    impl SecretStore for FakeSecretStore {
        async fn reveal(&self, secret_id: &str) -> Result<String, CollabError> {
            self.0
                .lock()
                .get(secret_id)
                .cloned()
                .ok_or_else(|| CollabError::SecretNotFound { secret_id: secret_id.to_string() })
        }
    }

    /// Returns a fixed, most-recent-first line buffer.
    #[derive(Default)]
    pub struct FakeStderrProvider(pub Mutex<Vec<String>>);

    #[async_trait]
    impl StderrProvider for FakeStderrProvider {
        async fn get_recent_stderr(&self) -> Result<Vec<String>, CollabError> {
            Ok(self.0.lock().clone())
        }
    }

    /// Records every `(title, message)` pair it receives.
    #[derive(Default)]
    pub struct FakeNotifyProvider(pub Mutex<Vec<(String, String)>>);

    #[async_trait]
    impl NotifyProvider for FakeNotifyProvider {
        async fn notify(&self, title: &str, message: &str) {
            self.0.lock().push((title.to_string(), message.to_string()));
        }
    }
}

#[cfg(test)]
#[path = "collab_tests.rs"]
mod tests;
