// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codex transport adapter: a stdio JSON-RPC-variant client that normalizes
//! Codex's item/turn/thread protocol into the shared [`AgentEvent`] model.

mod images;
mod mcp;
mod rpc;
mod stderr;

pub use images::{build_turn_inputs, ImageAttachment, ImageError, TurnInput};
pub use mcp::{build_command_args, McpServerConfig, McpTransport};
pub use stderr::{extract_from_stderr, ParsedStderrError};

use crate::error::TransportError;
use crate::log_utils::{log_normalized, log_raw, truncate_for_log, Direction};
use kandev_core::{
    ActionDetails, AgentEvent, ContextWindowStats, FileMutation, NormalizedPayload,
    PermissionDecision, PermissionOption, PermissionRequest, PlanEntry, ShellOutput,
};
use parking_lot::RwLock;
use rpc::{encode_line, IncomingMessage, OutgoingNotification, OutgoingRequest, OutgoingResponse};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};

/// Handler invoked synchronously for every out-of-band approval request.
/// Blocks the adapter's notification dispatcher until it returns, matching
/// the protocol's requirement that approvals gate further notifications.
pub trait PermissionHandler: Send + Sync {
    fn handle(&self, request: &PermissionRequest) -> PermissionHandlerResponse;
}

pub struct PermissionHandlerResponse {
    pub option_id: String,
    pub cancelled: bool,
}

/// Supplies the adapter's last-N stderr lines for the rate-limit fallback
/// extraction path.
pub trait StderrProvider: Send + Sync {
    fn get_recent_stderr(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdapterState {
    New,
    Connected,
    Initialized,
    SessionActive,
    TurnActive,
    Closed,
}

struct PendingCall {
    responder: oneshot::Sender<Result<Value, TransportError>>,
}

/// Streaming accumulation state for one in-flight turn. Reset at the start
/// of every `Prompt`.
#[derive(Default)]
struct TurnBuffers {
    message_buffer: String,
    reasoning_buffer: String,
    current_reasoning_item_id: Option<String>,
}

/// Internal mutable state guarded by one read-write lock. RPC calls must be
/// issued without this lock held — the notification dispatcher needs it too,
/// and holding it across an `await` would deadlock the read loop against
/// itself.
struct Inner {
    state: AdapterState,
    thread_id: Option<String>,
    turn_id: Option<String>,
    user_agent: Option<String>,
    pending: HashMap<u64, PendingCall>,
    turn_complete: Option<oneshot::Sender<Result<(), TransportError>>>,
    buffers: TurnBuffers,
    permission_handler: Option<Arc<dyn PermissionHandler>>,
    stderr_provider: Option<Arc<dyn StderrProvider>>,
}

/// Codex stdio transport adapter. One instance per session; owns the
/// subprocess's stdin/stdout pipes and the JSON-RPC client exclusively until
/// [`CodexAdapter::close`].
pub struct CodexAdapter {
    session_id: String,
    inner: RwLock<Inner>,
    next_id: AtomicU64,
    stdin: AsyncMutex<Option<tokio::process::ChildStdin>>,
    events_tx: mpsc::Sender<AgentEvent>,
}

const UPDATE_CHANNEL_CAPACITY: usize = 100;

impl CodexAdapter {
    pub fn new(session_id: impl Into<String>) -> (Self, mpsc::Receiver<AgentEvent>) {
        let (events_tx, events_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let adapter = Self {
            session_id: session_id.into(),
            inner: RwLock::new(Inner {
                state: AdapterState::New,
                thread_id: None,
                turn_id: None,
                user_agent: None,
                pending: HashMap::new(),
                turn_complete: None,
                buffers: TurnBuffers::default(),
                permission_handler: None,
                stderr_provider: None,
            }),
            next_id: AtomicU64::new(1),
            stdin: AsyncMutex::new(None),
            events_tx,
        };
        (adapter, events_rx)
    }

    pub fn set_permission_handler(&self, handler: Arc<dyn PermissionHandler>) {
        self.inner.write().permission_handler = Some(handler);
    }

    pub fn set_stderr_provider(&self, provider: Arc<dyn StderrProvider>) {
        self.inner.write().stderr_provider = Some(provider);
    }

    /// Idempotent-reject once connected: wires the subprocess pipes and
    /// spawns the read loop.
    pub async fn connect(
        &self,
        stdin: tokio::process::ChildStdin,
        stdout: tokio::process::ChildStdout,
        self_for_read_loop: Arc<Self>,
    ) -> Result<(), TransportError> {
        {
            let mut inner = self.inner.write();
            if inner.state != AdapterState::New {
                return Err(TransportError::AlreadyConnected);
            }
            inner.state = AdapterState::Connected;
        }
        *self.stdin.lock().await = Some(stdin);

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        log_raw(Direction::Received, line.as_bytes());
                        self_for_read_loop.handle_incoming_line(&line).await;
                    }
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(error = %err, "codex read loop: stdout closed with error");
                        break;
                    }
                }
            }
        });
        Ok(())
    }

    /// Deterministic extra CLI args for the subprocess: sandbox policy plus
    /// any configured MCP servers.
    pub fn prepare_command_args(servers: &[McpServerConfig]) -> Vec<String> {
        build_command_args(servers)
    }

    /// `initialize` handshake, then `initialized` notification.
    pub async fn initialize(&self, client_name: &str, client_title: &str, client_version: &str) -> Result<(), TransportError> {
        let params = json!({
            "client_info": {"name": client_name, "title": client_title, "version": client_version},
        });
        let result = self.call("initialize", Some(params)).await.map_err(|e| {
            TransportError::Handshake(e.to_string())
        })?;
        let user_agent = result.get("user_agent").and_then(Value::as_str).map(str::to_string);

        self.notify("initialized", None).await?;

        let mut inner = self.inner.write();
        inner.user_agent = user_agent;
        inner.state = AdapterState::Initialized;
        Ok(())
    }

    fn sandbox_policy(workdir: &str) -> Value {
        json!({
            "type": "workspace-write",
            "writable_roots": [workdir],
            "network_access": true,
        })
    }

    /// Starts a brand-new thread. Approval policy defaults to `untrusted`.
    pub async fn new_session(&self, cwd: &str) -> Result<String, TransportError> {
        self.ensure_initialized()?;
        let params = json!({
            "cwd": cwd,
            "approval_policy": "untrusted",
            "sandbox_policy": Self::sandbox_policy(cwd),
        });
        let result = self.call("thread/start", Some(params)).await?;
        let thread_id = result
            .get("thread_id")
            .and_then(Value::as_str)
            .ok_or_else(|| TransportError::Rpc("thread/start missing thread_id".to_string()))?
            .to_string();

        let mut inner = self.inner.write();
        inner.thread_id = Some(thread_id.clone());
        inner.state = AdapterState::SessionActive;
        Ok(thread_id)
    }

    /// Resumes a prior thread with the same sandbox/approval payload —
    /// critical for approval preservation across a restart.
    pub async fn load_session(&self, thread_id: &str, cwd: &str) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        let params = json!({
            "thread_id": thread_id,
            "cwd": cwd,
            "approval_policy": "untrusted",
            "sandbox_policy": Self::sandbox_policy(cwd),
        });
        self.call("thread/resume", Some(params)).await?;

        let mut inner = self.inner.write();
        inner.thread_id = Some(thread_id.to_string());
        inner.state = AdapterState::SessionActive;
        Ok(())
    }

    /// Sends a prompt and blocks until `turn/completed` fires. Emits deltas
    /// in order as they arrive, then a synthetic `complete` on success.
    pub async fn prompt(
        &self,
        workdir: &std::path::Path,
        text: &str,
        attachments: &[ImageAttachment],
    ) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        let inputs = build_turn_inputs(workdir, text, attachments)?;

        let (turn_complete_tx, turn_complete_rx) = oneshot::channel();
        {
            let mut inner = self.inner.write();
            inner.buffers = TurnBuffers::default();
            inner.turn_complete = Some(turn_complete_tx);
            inner.state = AdapterState::TurnActive;
        }

        let result = self.call("turn/start", Some(json!({ "input": inputs }))).await?;
        let turn_id = result
            .get("turn_id")
            .and_then(Value::as_str)
            .ok_or_else(|| TransportError::Rpc("turn/start missing turn_id".to_string()))?
            .to_string();
        self.inner.write().turn_id = Some(turn_id);

        let outcome = turn_complete_rx
            .await
            .map_err(|_| TransportError::Rpc("turn completion channel dropped".to_string()))?;

        self.inner.write().state = AdapterState::SessionActive;
        outcome?;

        self.emit(AgentEvent::Complete {
            session_id: self.session_id.clone(),
            operation_id: self.current_turn_id(),
        })
        .await;
        Ok(())
    }

    /// `turn/interrupt`; does not terminate the subprocess.
    pub async fn cancel(&self) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        self.call("turn/interrupt", None).await?;
        Ok(())
    }

    /// Idempotent: cancels the adapter, stops reading, closes the update
    /// channel by dropping the sender.
    pub async fn close(&self) {
        {
            let mut inner = self.inner.write();
            if inner.state == AdapterState::Closed {
                return;
            }
            inner.state = AdapterState::Closed;
        }
        *self.stdin.lock().await = None;
    }

    fn ensure_initialized(&self) -> Result<(), TransportError> {
        let state = self.inner.read().state;
        if matches!(state, AdapterState::New | AdapterState::Connected) {
            return Err(TransportError::NotInitialized);
        }
        Ok(())
    }

    fn current_turn_id(&self) -> String {
        self.inner.read().turn_id.clone().unwrap_or_default()
    }

    async fn emit(&self, event: AgentEvent) {
        log_normalized(&event);
        if self.events_tx.try_send(event).is_err() {
            tracing::warn!(session_id = %self.session_id, "codex adapter: update channel full, dropping event");
        }
    }

    async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.inner.write().pending.insert(id, PendingCall { responder: tx });

        let request = OutgoingRequest { id, method: method.to_string(), params };
        self.write_line(&request).await?;

        rx.await.map_err(|_| TransportError::Rpc(format!("{method}: response channel dropped")))?
    }

    async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), TransportError> {
        let notification = OutgoingNotification { method: method.to_string(), params };
        self.write_line(&notification).await
    }

    async fn write_line(&self, value: &impl serde::Serialize) -> Result<(), TransportError> {
        let line = encode_line(value)?;
        log_raw(Direction::Sent, &line);
        let mut guard = self.stdin.lock().await;
        let Some(stdin) = guard.as_mut() else {
            return Err(TransportError::NotInitialized);
        };
        stdin.write_all(&line).await?;
        stdin.flush().await?;
        Ok(())
    }

    async fn handle_incoming_line(&self, line: &str) {
        let message: IncomingMessage = match serde_json::from_str(line) {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(error = %err, line = %truncate_for_log(line, 500), "codex: failed to parse message");
                return;
            }
        };

        if message.is_response() {
            self.dispatch_response(message);
        } else if message.is_request() {
            self.handle_server_request(message).await;
        } else if message.is_notification() {
            self.handle_notification(message).await;
        }
    }

    fn dispatch_response(&self, message: IncomingMessage) {
        let Some(id) = message.id else { return };
        let Some(pending) = self.inner.write().pending.remove(&id) else { return };
        let result = match (message.result, message.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(TransportError::Rpc(error.to_string())),
            (None, None) => Ok(Value::Null),
        };
        let _ = pending.responder.send(result);
    }

    async fn handle_server_request(&self, message: IncomingMessage) {
        let Some(id) = message.id else { return };
        let Some(method) = message.method.clone() else { return };
        let params = message.params.unwrap_or(Value::Null);

        let decision = match method.as_str() {
            "item/cmdExec/requestApproval" | "item/fileChange/requestApproval" => {
                self.resolve_approval(&params).await
            }
            _ => "accept".to_string(),
        };

        let response = OutgoingResponse {
            id,
            result: Some(json!({ "decision": decision })),
            error: None,
        };
        if let Err(err) = self.write_line(&response).await {
            tracing::warn!(error = %err, "codex: failed to send approval response");
        }
    }

    async fn resolve_approval(&self, params: &Value) -> String {
        let request = match parse_permission_request(&self.session_id, params) {
            Some(request) => request,
            None => return "accept".to_string(),
        };

        let handler = self.inner.read().permission_handler.clone();
        let Some(handler) = handler else { return "accept".to_string() };

        let response = handler.handle(&request);
        if response.cancelled {
            return "cancel".to_string();
        }
        PermissionDecision::from_option_id(&response.option_id).wire_decision()
    }

    #[tracing::instrument(skip_all, fields(session_id = tracing::field::Empty, thread_id = tracing::field::Empty, turn_id = tracing::field::Empty))]
    async fn handle_notification(&self, message: IncomingMessage) {
        let Some(method) = message.method.clone() else { return };
        let params = message.params.unwrap_or(Value::Null);
        let session_id = self.session_id.clone();
        let operation_id = self.current_turn_id();

        let mut trace = crate::TraceContext::new(&session_id);
        trace.turn_id = self.inner.read().turn_id.clone();
        trace.thread_id = self.inner.read().thread_id.clone();
        trace.record_on_current_span();

        match method.as_str() {
            "item/agentMessage/delta" => {
                let Some(delta) = params.get("delta").and_then(Value::as_str) else { return };
                self.inner.write().buffers.message_buffer.push_str(delta);
                self.emit(AgentEvent::MessageChunk {
                    session_id,
                    operation_id,
                    text: delta.to_string(),
                    diff: None,
                })
                .await;
            }
            "item/reasoningText/delta" | "item/reasoningSummary/delta" => {
                let Some(delta) = params.get("delta").and_then(Value::as_str) else { return };
                let item_id = params.get("item_id").and_then(Value::as_str).map(str::to_string);
                {
                    let mut inner = self.inner.write();
                    if inner.buffers.current_reasoning_item_id != item_id
                        && !inner.buffers.reasoning_buffer.is_empty()
                    {
                        inner.buffers.reasoning_buffer.push_str("\n\n");
                    }
                    inner.buffers.reasoning_buffer.push_str(delta);
                    inner.buffers.current_reasoning_item_id = item_id;
                }
                self.emit(AgentEvent::Reasoning {
                    session_id,
                    operation_id,
                    reasoning_text: delta.to_string(),
                })
                .await;
            }
            "turn/diff/updated" => {
                let Some(diff) = params.get("diff").and_then(Value::as_str) else { return };
                self.emit(AgentEvent::MessageChunk {
                    session_id,
                    operation_id,
                    text: String::new(),
                    diff: Some(diff.to_string()),
                })
                .await;
            }
            "turn/plan/updated" => {
                let entries: Vec<PlanEntry> = params
                    .get("plan")
                    .and_then(|p| serde_json::from_value(p.clone()).ok())
                    .unwrap_or_default();
                self.emit(AgentEvent::Plan { session_id, operation_id, plan_entries: entries }).await;
            }
            "thread/tokenUsage/updated" => {
                let used = params.get("used").and_then(Value::as_u64).unwrap_or(0);
                let max = params.get("size").and_then(Value::as_u64).unwrap_or(0);
                self.emit(AgentEvent::ContextWindow {
                    session_id,
                    operation_id,
                    stats: ContextWindowStats::new(used, max),
                })
                .await;
            }
            "item/started" => self.handle_item_started(&params, &session_id, &operation_id).await,
            "item/completed" => self.handle_item_completed(&params, &session_id, &operation_id).await,
            "item/cmdExec/outputDelta" => {
                let Some(tool_call_id) = params.get("tool_call_id").and_then(Value::as_str) else {
                    return;
                };
                self.emit(AgentEvent::ToolUpdate {
                    session_id,
                    operation_id,
                    tool_call_id: tool_call_id.to_string(),
                    status: kandev_core::ToolUpdateStatus::Running,
                    payload: None,
                })
                .await;
            }
            "error" => self.handle_error_notification(&params, &session_id, &operation_id).await,
            "turn/completed" => self.handle_turn_completed(&params, &session_id, &operation_id).await,
            "context/compacted" => {
                tracing::debug!(session_id = %session_id, "codex: context compacted");
            }
            "token_count" => {
                // Legacy notification, intentionally ignored; kept as an
                // explicit arm so a future protocol revision reviving it has
                // an obvious insertion point.
            }
            other => {
                tracing::trace!(method = other, "codex: unhandled notification");
            }
        }
    }

    async fn handle_item_started(&self, params: &Value, session_id: &str, operation_id: &str) {
        let Some(item_type) = params.get("item_type").and_then(Value::as_str) else { return };
        let Some(tool_call_id) = params.get("tool_call_id").and_then(Value::as_str) else { return };

        let payload = match item_type {
            "commandExecution" => {
                let command: Vec<String> = params
                    .get("command")
                    .and_then(|c| serde_json::from_value(c.clone()).ok())
                    .unwrap_or_default();
                let cwd = params.get("cwd").and_then(Value::as_str).map(str::to_string);
                NormalizedPayload::new_shell_exec(command, cwd)
            }
            "fileChange" => {
                let path = params.get("path").and_then(Value::as_str).unwrap_or_default();
                NormalizedPayload::new_modify_file(path, Vec::<FileMutation>::new())
            }
            "mcpToolCall" => {
                let tool = params.get("tool").and_then(Value::as_str).unwrap_or_default();
                NormalizedPayload::new_generic(tool, params.get("args").cloned().unwrap_or(Value::Null))
            }
            _ => return,
        };

        self.emit(AgentEvent::ToolCall {
            session_id: session_id.to_string(),
            operation_id: operation_id.to_string(),
            tool_call_id: tool_call_id.to_string(),
            payload,
        })
        .await;
    }

    async fn handle_item_completed(&self, params: &Value, session_id: &str, operation_id: &str) {
        let Some(tool_call_id) = params.get("tool_call_id").and_then(Value::as_str) else { return };
        let success = params.get("success").and_then(Value::as_bool).unwrap_or(true);
        let status =
            if success { kandev_core::ToolUpdateStatus::Complete } else { kandev_core::ToolUpdateStatus::Error };

        let payload = params.get("item_type").and_then(Value::as_str).map(|item_type| match item_type {
            "commandExecution" => NormalizedPayload::ShellExec {
                command: Vec::new(),
                cwd: None,
                output: Some(ShellOutput {
                    stdout: params.get("stdout").and_then(Value::as_str).unwrap_or_default().to_string(),
                    exit_code: params.get("exit_code").and_then(Value::as_i64).unwrap_or(0) as i32,
                }),
            },
            "fileChange" => {
                let path = params.get("path").and_then(Value::as_str).unwrap_or_default();
                NormalizedPayload::new_modify_file(path, reconstruct_file_mutations(params))
            }
            _ => NormalizedPayload::new_generic(item_type, Value::Null),
        });

        self.emit(AgentEvent::ToolUpdate {
            session_id: session_id.to_string(),
            operation_id: operation_id.to_string(),
            tool_call_id: tool_call_id.to_string(),
            status,
            payload,
        })
        .await;
    }

    async fn handle_error_notification(&self, params: &Value, session_id: &str, operation_id: &str) {
        let message = params.get("message").and_then(Value::as_str).unwrap_or("unknown error").to_string();

        let recent_stderr = self.inner.read().stderr_provider.clone().map(|p| p.get_recent_stderr());
        let parsed = recent_stderr.as_deref().and_then(extract_from_stderr);
        let text = parsed.as_ref().map(ParsedStderrError::human_message).unwrap_or_else(|| message.clone());

        self.emit(AgentEvent::Error { session_id: session_id.to_string(), operation_id: operation_id.to_string(), message: text })
            .await;
    }

    async fn handle_turn_completed(&self, params: &Value, session_id: &str, operation_id: &str) {
        let success = params.get("success").and_then(Value::as_bool).unwrap_or(true);
        let error = params.get("error").and_then(Value::as_str).filter(|e| !e.is_empty());

        if !success {
            if let Some(error) = error {
                self.emit(AgentEvent::Error {
                    session_id: session_id.to_string(),
                    operation_id: operation_id.to_string(),
                    message: error.to_string(),
                })
                .await;
            }
        }

        let outcome = if success {
            Ok(())
        } else {
            Err(TransportError::TurnFailed(error.unwrap_or("turn failed").to_string()))
        };

        if let Some(sender) = self.inner.write().turn_complete.take() {
            let _ = sender.send(outcome);
        }
    }
}

/// Reconstructs the `modify_file` mutation list for a completed `fileChange`
/// item from its `changes` array. Patch/create diffs reported across the
/// item's lifetime are concatenated into a single mutation per type; delete
/// entries carry no diff and pass through as-is.
fn reconstruct_file_mutations(params: &Value) -> Vec<FileMutation> {
    let Some(changes) = params.get("changes").and_then(Value::as_array) else { return Vec::new() };

    let mut patch_diff = String::new();
    let mut create_diff = String::new();
    let mut mutations = Vec::new();

    for change in changes {
        let diff = change.get("diff").and_then(Value::as_str).unwrap_or_default();
        match change.get("type").and_then(Value::as_str) {
            Some("create") => create_diff.push_str(diff),
            Some("delete") => mutations.push(FileMutation::Delete {}),
            _ => patch_diff.push_str(diff),
        }
    }

    if !create_diff.is_empty() {
        mutations.push(FileMutation::Create { diff: create_diff });
    }
    if !patch_diff.is_empty() {
        mutations.push(FileMutation::Patch { diff: patch_diff });
    }

    mutations
}

/// Parses approval request params into [`PermissionRequest`], applying the
/// default/mapped option vocabulary when the server omits one.
fn parse_permission_request(session_id: &str, params: &Value) -> Option<PermissionRequest> {
    let tool_call_id = params.get("tool_call_id").and_then(Value::as_str)?.to_string();
    let title = params.get("title").and_then(Value::as_str).unwrap_or_default().to_string();

    let raw_options: Vec<String> = params
        .get("options")
        .and_then(|o| serde_json::from_value(o.clone()).ok())
        .unwrap_or_default();

    let options = if raw_options.is_empty() {
        vec![
            PermissionOption { option_id: "approve".to_string(), label: "Approve".to_string() },
            PermissionOption { option_id: "reject".to_string(), label: "Reject".to_string() },
        ]
    } else {
        raw_options
            .into_iter()
            .map(|id| {
                let label = match id.as_str() {
                    "approveAlways" => "Approve always".to_string(),
                    "reject" => "Reject".to_string(),
                    _ => "Allow once".to_string(),
                };
                PermissionOption { option_id: id, label }
            })
            .collect()
    };

    let is_file_change = params.get("action_type").and_then(Value::as_str) == Some("fileChange");
    let action_details = if is_file_change {
        let paths: Vec<String> =
            params.get("paths").and_then(|p| serde_json::from_value(p.clone()).ok()).unwrap_or_default();
        ActionDetails::FileChange { paths }
    } else {
        let command: Vec<String> =
            params.get("command").and_then(|c| serde_json::from_value(c.clone()).ok()).unwrap_or_default();
        let cwd = params.get("cwd").and_then(Value::as_str).map(str::to_string);
        ActionDetails::CmdExec { command, cwd }
    };

    Some(PermissionRequest {
        session_id: session_id.to_string(),
        tool_call_id,
        title,
        options,
        action_details,
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
