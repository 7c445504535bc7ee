// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Zstd-compressed JSON snapshot store: one file per task, task-session, and
//! executor-running record, each written atomically (write to a `.tmp`
//! sibling, then rename).

use crate::error::StorageError;
use async_trait::async_trait;
use kandev_core::collab::{CollabError, Repository};
use kandev_core::{ExecutorRunning, Task, TaskSession};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

const ZSTD_LEVEL: i32 = 3;

/// Backs `Repository` with one zstd-compressed JSON document per entity
/// under `state_dir/{tasks,sessions,running}/<id>.json.zst`.
pub struct FileSessionStore {
    state_dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self { state_dir: state_dir.into() }
    }

    fn path_for(&self, kind: &str, id: &str) -> PathBuf {
        self.state_dir.join(kind).join(format!("{id}.json.zst"))
    }

    async fn write_snapshot<T: Serialize>(path: PathBuf, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_vec(value)?;
        let compressed = zstd::encode_all(json.as_slice(), ZSTD_LEVEL)
            .map_err(|source| StorageError::Write { path: path.clone(), source })?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Write { path: path.clone(), source })?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, &compressed)
            .await
            .map_err(|source| StorageError::Write { path: path.clone(), source })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StorageError::Write { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), "wrote session snapshot");
        Ok(())
    }

    async fn read_snapshot<T: DeserializeOwned>(
        path: &Path,
        kind: &'static str,
        id: &str,
    ) -> Result<T, StorageError> {
        let compressed = tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound { kind, id: id.to_string() }
            } else {
                StorageError::Read { path: path.to_path_buf(), source }
            }
        })?;
        let json = zstd::decode_all(compressed.as_slice())
            .map_err(|source| StorageError::Read { path: path.to_path_buf(), source })?;
        Ok(serde_json::from_slice(&json)?)
    }
}

fn to_collab(err: StorageError) -> CollabError {
    CollabError::Repository(err.to_string())
}

#[async_trait]
impl Repository for FileSessionStore {
    async fn get_task(&self, task_id: &str) -> Result<Task, CollabError> {
        Self::read_snapshot(&self.path_for("tasks", task_id), "task", task_id).await.map_err(to_collab)
    }

    async fn save_task(&self, task: &Task) -> Result<(), CollabError> {
        Self::write_snapshot(self.path_for("tasks", task.id.as_str()), task).await.map_err(to_collab)
    }

    async fn get_session(&self, session_id: &str) -> Result<TaskSession, CollabError> {
        Self::read_snapshot(&self.path_for("sessions", session_id), "session", session_id)
            .await
            .map_err(to_collab)
    }

    async fn save_session(&self, session: &TaskSession) -> Result<(), CollabError> {
        Self::write_snapshot(self.path_for("sessions", session.id.as_str()), session).await.map_err(to_collab)
    }

    async fn list_sessions_for_task(&self, task_id: &str) -> Result<Vec<TaskSession>, CollabError> {
        let dir = self.state_dir.join("sessions");
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(to_collab(StorageError::Read { path: dir, source })),
        };

        let mut out = Vec::new();
        loop {
            let entry = entries
                .next_entry()
                .await
                .map_err(|source| to_collab(StorageError::Read { path: dir.clone(), source }))?;
            let Some(entry) = entry else { break };
            let path = entry.path();
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()).map(|s| s.trim_end_matches(".json").to_string())
            else {
                continue;
            };
            let session: TaskSession =
                Self::read_snapshot(&path, "session", &id).await.map_err(to_collab)?;
            if session.task_id.as_str() == task_id {
                out.push(session);
            }
        }
        Ok(out)
    }

    async fn get_executor_running(&self, session_id: &str) -> Result<Option<ExecutorRunning>, CollabError> {
        let path = self.path_for("running", session_id);
        match Self::read_snapshot(&path, "executor_running", session_id).await {
            Ok(running) => Ok(Some(running)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(err) => Err(to_collab(err)),
        }
    }

    async fn save_executor_running(
        &self,
        session_id: &str,
        running: &ExecutorRunning,
    ) -> Result<(), CollabError> {
        Self::write_snapshot(self.path_for("running", session_id), running).await.map_err(to_collab)
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;
