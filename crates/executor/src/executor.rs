// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The session executor: the orchestrator's state machine for preparing,
//! launching, resuming, and tearing down task sessions.

use crate::callbacks::{SessionStateObserver, TaskStateObserver};
use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use crate::lock_map::SessionLockMap;
use crate::repo_resolver::RepoInfo;
use kandev_core::{
    AgentManagerClient, AgentProfile, AgentProfileId, Clock, CollabError, ExecutionStatus, ExecutorRunning,
    LaunchAgentRequest, Repository, RuntimeKind, SessionId, SessionState, ShellPreferenceProvider, Task,
    TaskId, TaskSession, TaskSessionWorktree, TaskState, WorktreeId,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The error substring the agent manager uses to report a session that is
/// already occupied by a live subprocess; matched for stale-execution
/// recovery in `resume_session`.
const ALREADY_RUNNING_MARKER: &str = "already has an agent running";

pub struct SessionExecutor {
    repository: Arc<dyn Repository>,
    agent_manager: Arc<dyn AgentManagerClient>,
    shell_preference: Arc<dyn ShellPreferenceProvider>,
    clock: Arc<dyn Clock>,
    config: ExecutorConfig,
    locks: SessionLockMap,
    task_observer: Option<Arc<dyn TaskStateObserver>>,
    session_observer: Option<Arc<dyn SessionStateObserver>>,
}

impl SessionExecutor {
    pub fn new(
        repository: Arc<dyn Repository>,
        agent_manager: Arc<dyn AgentManagerClient>,
        shell_preference: Arc<dyn ShellPreferenceProvider>,
        clock: Arc<dyn Clock>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            repository,
            agent_manager,
            shell_preference,
            clock,
            config,
            locks: SessionLockMap::new(),
            task_observer: None,
            session_observer: None,
        }
    }

    pub fn with_task_observer(mut self, observer: Arc<dyn TaskStateObserver>) -> Self {
        self.task_observer = Some(observer);
        self
    }

    pub fn with_session_observer(mut self, observer: Arc<dyn SessionStateObserver>) -> Self {
        self.session_observer = Some(observer);
        self
    }

    /// Resolves the primary task repo, creates the session row
    /// (`state=created`, `is_primary=true`), clears the primary flag on
    /// every other session belonging to `task`, and persists the executor
    /// assignment. Fails if `agent_profile_id` is empty.
    pub async fn prepare_session(
        &self,
        task: &Task,
        agent_profile_id: &AgentProfileId,
        profile_snapshot: AgentProfile,
        repo: Option<&RepoInfo>,
        executor_id: Option<String>,
        executor_profile_id: Option<String>,
        workflow_step_id: Option<String>,
    ) -> Result<SessionId, ExecutorError> {
        if agent_profile_id.is_empty() {
            return Err(ExecutorError::AgentProfileRequired);
        }

        for mut other in self.repository.list_sessions_for_task(task.id.as_str()).await? {
            if other.is_primary {
                other.is_primary = false;
                other.updated_at_ms = self.clock.epoch_ms();
                self.repository.save_session(&other).await?;
            }
        }

        let now = self.clock.epoch_ms();
        let session = TaskSession {
            id: SessionId::new(),
            task_id: task.id,
            agent_profile_id: *agent_profile_id,
            repository_id: task.repository_id.clone(),
            base_branch: repo.map(|r| r.default_branch.clone()),
            state: SessionState::Created,
            agent_execution_id: None,
            container_id: None,
            error_message: None,
            is_passthrough: profile_snapshot.is_passthrough_model(),
            agent_profile_snapshot: profile_snapshot,
            executor_id,
            executor_profile_id,
            workflow_step_id,
            is_primary: true,
            started_at_ms: now,
            updated_at_ms: now,
            completed_at_ms: None,
            worktrees: Vec::new(),
        };
        self.repository.save_session(&session).await?;
        Ok(session.id)
    }

    /// Fast-paths when the session already has a live workspace; otherwise
    /// launches a fresh one and spawns the async agent-process start.
    pub async fn launch_prepared_session(
        &self,
        task: &Task,
        session_id: &SessionId,
        runtime: RuntimeKind,
        repo: Option<&RepoInfo>,
        prompt: &str,
    ) -> Result<JoinHandle<()>, ExecutorError> {
        let mut session = self.repository.get_session(session_id.as_str()).await?;

        if session.has_live_execution() {
            self.agent_manager.set_execution_description(session_id.as_str(), prompt).await?;
            self.transition_session(&task.id, &mut session, SessionState::Starting, None).await?;
            return Ok(self.spawn_start(task.id, session_id.clone(), false));
        }

        let req = self.build_launch_request(&session, runtime, repo, None, Some(prompt.to_string())).await?;
        let running = match self.agent_manager.launch_agent(req).await {
            Ok(running) => running,
            Err(err) => {
                self.transition_session(&task.id, &mut session, SessionState::Failed, Some(&err.to_string()))
                    .await?;
                self.transition_task(&task.id, TaskState::Failed).await?;
                return Err(err.into());
            }
        };

        self.apply_running(&mut session, &running, runtime, repo);
        self.repository.save_session(&session).await?;
        self.repository.save_executor_running(session_id.as_str(), &running).await?;
        self.transition_session(&task.id, &mut session, SessionState::Starting, None).await?;

        Ok(self.spawn_start(task.id, session_id.clone(), false))
    }

    /// Per-session-locked resume. Rejects a still-live execution, carries
    /// the resume token forward, and retries once through stale-execution
    /// cleanup when the agent manager reports the session already running.
    pub async fn resume_session(
        &self,
        task: &Task,
        session_id: &SessionId,
        runtime: RuntimeKind,
        repo: Option<&RepoInfo>,
        start_agent: bool,
    ) -> Result<Option<JoinHandle<()>>, ExecutorError> {
        self.locks
            .with_lock(session_id.as_str(), || {
                self.resume_session_locked(task, session_id, runtime, repo, start_agent)
            })
            .await
    }

    async fn resume_session_locked(
        &self,
        task: &Task,
        session_id: &SessionId,
        runtime: RuntimeKind,
        repo: Option<&RepoInfo>,
        start_agent: bool,
    ) -> Result<Option<JoinHandle<()>>, ExecutorError> {
        let mut session = self.repository.get_session(session_id.as_str()).await?;
        let existing = self.repository.get_executor_running(session_id.as_str()).await?;
        if existing.as_ref().is_some_and(ExecutorRunning::is_live) {
            return Err(ExecutorError::AlreadyRunning(session_id.to_string()));
        }

        let resume_token = existing.as_ref().and_then(|r| r.resume_token.clone());
        let was_waiting = session.state == SessionState::WaitingForInput;
        // Fresh-start resume never auto-prompts: no task_description carried forward.
        let req = self.build_launch_request(&session, runtime, repo, resume_token.clone(), None).await?;

        let mut running = match self.agent_manager.launch_agent(req.clone()).await {
            Ok(running) => running,
            Err(CollabError::AgentManager(msg)) if msg.contains(ALREADY_RUNNING_MARKER) => {
                self.agent_manager.cleanup_stale_execution_by_session_id(session_id.as_str()).await?;
                self.agent_manager.launch_agent(req).await?
            }
            Err(err) => return Err(err.into()),
        };
        running.resume_token = running.resume_token.clone().or(resume_token);

        self.apply_running(&mut session, &running, runtime, repo);
        self.repository.save_session(&session).await?;
        self.repository.save_executor_running(session_id.as_str(), &running).await?;
        self.transition_session(&task.id, &mut session, SessionState::Starting, None).await?;

        if !start_agent {
            return Ok(None);
        }
        Ok(Some(self.spawn_start(task.id, session_id.clone(), was_waiting)))
    }

    pub async fn prompt(&self, session_id: &SessionId, prompt: &str) -> Result<(), ExecutorError> {
        self.agent_manager.prompt_agent(session_id.as_str(), prompt).await.map_err(|err| match err {
            CollabError::AgentManager(msg) if msg.contains("not found") => {
                ExecutorError::ExecutionNotFound(session_id.to_string())
            }
            other => other.into(),
        })
    }

    /// Interrupts the current turn without killing the subprocess.
    pub async fn cancel(&self, session_id: &SessionId) -> Result<(), ExecutorError> {
        self.agent_manager.cancel_agent(session_id.as_str()).await.map_err(Into::into)
    }

    /// Best-effort subprocess stop, then transitions the session to `cancelled`.
    pub async fn stop(&self, task: &Task, session_id: &SessionId) -> Result<(), ExecutorError> {
        let mut session = self.repository.get_session(session_id.as_str()).await?;
        if let Err(err) = self.agent_manager.stop_agent(session_id.as_str()).await {
            tracing::warn!(session_id = %session_id, %err, "stop_agent failed; transitioning session anyway");
        }
        self.transition_session(&task.id, &mut session, SessionState::Cancelled, None).await
    }

    pub async fn stop_by_task_id(&self, task: &Task) -> Result<(), ExecutorError> {
        for session in self.repository.list_sessions_for_task(task.id.as_str()).await? {
            if !session.state.is_terminal() {
                self.stop(task, &session.id).await?;
            }
        }
        Ok(())
    }

    /// Stops the current agent, relaunches with `model_override`, and
    /// updates the session's profile snapshot in place.
    pub async fn switch_model(
        &self,
        task: &Task,
        session_id: &SessionId,
        new_model: &str,
        runtime: RuntimeKind,
        repo: Option<&RepoInfo>,
        prompt: Option<&str>,
    ) -> Result<JoinHandle<()>, ExecutorError> {
        let mut session = self.repository.get_session(session_id.as_str()).await?;
        if let Err(err) = self.agent_manager.stop_agent(session_id.as_str()).await {
            tracing::warn!(session_id = %session_id, %err, "stop_agent failed before model switch");
        }

        let existing = self.repository.get_executor_running(session_id.as_str()).await?;
        let resume_token = existing.as_ref().and_then(|r| r.resume_token.clone());
        let mut req =
            self.build_launch_request(&session, runtime, repo, resume_token.clone(), prompt.map(str::to_string)).await?;
        req.model_override = Some(new_model.to_string());
        if let Some(worktree) = session.primary_worktree() {
            req.worktree_path = Some(worktree.path.to_string_lossy().into_owned());
            req.worktree_branch = Some(worktree.branch.clone());
        }

        let mut running = self.agent_manager.launch_agent(req).await?;
        running.resume_token = running.resume_token.clone().or(resume_token);

        self.apply_running(&mut session, &running, runtime, repo);
        session.agent_profile_snapshot.model = new_model.to_string();
        session.agent_profile_snapshot.updated_at_ms = self.clock.epoch_ms();
        self.repository.save_session(&session).await?;
        self.repository.save_executor_running(session_id.as_str(), &running).await?;
        self.transition_session(&task.id, &mut session, SessionState::Starting, None).await?;

        Ok(self.spawn_start(task.id, session_id.clone(), false))
    }

    pub async fn respond_to_permission(
        &self,
        session_id: &SessionId,
        tool_call_id: &str,
        option_id: &str,
        cancelled: bool,
    ) -> Result<(), ExecutorError> {
        self.agent_manager
            .respond_to_permission_by_session_id(session_id.as_str(), tool_call_id, option_id, cancelled)
            .await
            .map_err(Into::into)
    }

    /// DB lookup plus liveness probe. Within a 30-second (configurable)
    /// startup grace window, a `starting`/`running` session is still
    /// reported live even when the probe says otherwise.
    pub async fn get_execution_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<ExecutorRunning>, ExecutorError> {
        let session = self.repository.get_session(session_id.as_str()).await?;
        let Some(mut running) = self.repository.get_executor_running(session_id.as_str()).await? else {
            return Ok(None);
        };

        let probe_live = self.agent_manager.is_agent_running_for_session(session_id.as_str()).await?;
        if !probe_live {
            let grace_ms = self.config.startup_liveness_grace_window_secs * 1000;
            let within_grace = matches!(session.state, SessionState::Starting | SessionState::Running)
                && self.clock.epoch_ms().saturating_sub(session.started_at_ms) < grace_ms;
            if !within_grace {
                running.status = ExecutionStatus::Exited;
                self.repository.save_executor_running(session_id.as_str(), &running).await?;
            }
        }

        Ok(Some(running))
    }

    /// Writes the terminal session state; does not cascade to task state.
    pub async fn mark_completed_by_session(
        &self,
        task_id: &TaskId,
        session_id: &SessionId,
        final_state: SessionState,
    ) -> Result<(), ExecutorError> {
        let mut session = self.repository.get_session(session_id.as_str()).await?;
        self.transition_session(task_id, &mut session, final_state, None).await
    }

    async fn build_launch_request(
        &self,
        session: &TaskSession,
        runtime: RuntimeKind,
        repo: Option<&RepoInfo>,
        resume_token: Option<String>,
        task_description: Option<String>,
    ) -> Result<LaunchAgentRequest, ExecutorError> {
        let executor_id =
            session.executor_id.clone().or_else(|| self.config.default_executor_id.clone()).unwrap_or_default();
        let defaults = match runtime {
            RuntimeKind::Local => &self.config.runtimes.local,
            RuntimeKind::Worktree => &self.config.runtimes.worktree,
            RuntimeKind::RemoteDocker => &self.config.runtimes.remote_docker,
        };

        let mut env = Vec::new();
        let mut worktree_path = None;
        let mut worktree_branch = None;
        let mut clone_url = None;

        match runtime {
            RuntimeKind::Local | RuntimeKind::Worktree => {
                let shell = self.shell_preference.preferred_shell().await?;
                env.push(("SHELL".to_string(), shell));
                if runtime == RuntimeKind::Worktree {
                    if let Some(repo) = repo {
                        worktree_path = repo.local_path.clone();
                        worktree_branch =
                            Some(format!("{}{}", repo.worktree_branch_prefix, session.id.suffix()));
                    }
                }
            }
            RuntimeKind::RemoteDocker => {
                clone_url = repo.and_then(RepoInfo::clone_url);
                if clone_url.is_none() {
                    return Err(ExecutorError::RemoteDockerNoRepoUrl);
                }
            }
        }

        Ok(LaunchAgentRequest {
            session_id: session.id.to_string(),
            executor_id,
            setup_script: defaults.setup_script.clone(),
            worktree_path,
            worktree_branch,
            clone_url,
            env,
            resume_token,
            model_override: None,
            task_description,
        })
    }

    fn apply_running(
        &self,
        session: &mut TaskSession,
        running: &ExecutorRunning,
        runtime: RuntimeKind,
        repo: Option<&RepoInfo>,
    ) {
        session.agent_execution_id = Some(running.agent_execution_id.clone());
        session.container_id = running.container_id.clone();
        session.updated_at_ms = self.clock.epoch_ms();

        if runtime == RuntimeKind::Worktree {
            if let (Some(path), Some(branch)) = (&running.worktree_path, &running.worktree_branch) {
                let worktree_id = running
                    .worktree_id
                    .as_deref()
                    .map(WorktreeId::from_string)
                    .unwrap_or_else(WorktreeId::new);
                session.worktrees = vec![TaskSessionWorktree {
                    session_id: session.id,
                    worktree_id,
                    repository_id: repo.map(|r| r.repository_id.clone()).unwrap_or_default(),
                    position: 0,
                    path: path.clone(),
                    branch: branch.clone(),
                }];
            }
        }
    }

    async fn transition_task(&self, task_id: &TaskId, state: TaskState) -> Result<(), ExecutorError> {
        apply_task_state(&self.repository, &self.clock, self.task_observer.as_ref(), task_id, state).await
    }

    async fn transition_session(
        &self,
        task_id: &TaskId,
        session: &mut TaskSession,
        state: SessionState,
        error: Option<&str>,
    ) -> Result<(), ExecutorError> {
        apply_session_state(&self.repository, &self.clock, self.session_observer.as_ref(), task_id, session, state, error)
            .await
    }

    /// Spawns the background agent-process start. On success transitions the
    /// task to `in_progress` (or, if the session was `waiting_for_input`
    /// before resume, to `review`); on failure to `failed`.
    fn spawn_start(&self, task_id: TaskId, session_id: SessionId, was_waiting: bool) -> JoinHandle<()> {
        let agent_manager = self.agent_manager.clone();
        let repository = self.repository.clone();
        let clock = self.clock.clone();
        let task_observer = self.task_observer.clone();

        tokio::spawn(async move {
            let result = agent_manager.start_agent_process(session_id.as_str()).await;
            let state = match (result.is_ok(), was_waiting) {
                (true, true) => TaskState::Review,
                (true, false) => TaskState::InProgress,
                (false, _) => TaskState::Failed,
            };
            let _ = apply_task_state(&repository, &clock, task_observer.as_ref(), &task_id, state).await;
        })
    }
}

async fn apply_task_state(
    repository: &Arc<dyn Repository>,
    clock: &Arc<dyn Clock>,
    observer: Option<&Arc<dyn TaskStateObserver>>,
    task_id: &TaskId,
    state: TaskState,
) -> Result<(), ExecutorError> {
    if let Some(observer) = observer {
        observer.on_task_state_change(task_id, state).await;
        return Ok(());
    }
    let mut task = repository.get_task(task_id.as_str()).await?;
    task.state = state;
    task.updated_at_ms = clock.epoch_ms();
    repository.save_task(&task).await?;
    Ok(())
}

async fn apply_session_state(
    repository: &Arc<dyn Repository>,
    clock: &Arc<dyn Clock>,
    observer: Option<&Arc<dyn SessionStateObserver>>,
    task_id: &TaskId,
    session: &mut TaskSession,
    state: SessionState,
    error: Option<&str>,
) -> Result<(), ExecutorError> {
    session.state = state;
    session.error_message = error.map(str::to_string);
    session.updated_at_ms = clock.epoch_ms();
    if state.is_terminal() {
        session.completed_at_ms = Some(session.updated_at_ms);
    }

    if let Some(observer) = observer {
        observer.on_session_state_change(task_id, &session.id, state, error).await;
    } else {
        repository.save_session(session).await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
