// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor configuration: loaded once at daemon startup from TOML, then
//! consulted by the launch-request builders and the liveness probe.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Per-runtime defaults the launch-request builder falls back to when a
/// session's executor config doesn't override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeDefaults {
    pub setup_script: Option<String>,
    pub cleanup_script: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeDefaultsTable {
    pub local: RuntimeDefaults,
    pub worktree: RuntimeDefaults,
    pub remote_docker: RuntimeDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub state_dir: PathBuf,
    pub default_executor_id: Option<String>,
    pub runtimes: RuntimeDefaultsTable,
    pub worktree_branch_prefix: String,
    /// How many times `ResumeSession` retries after a stale-execution cleanup.
    pub stale_execution_retry_budget: u32,
    /// Startup liveness grace window, in seconds (see `GetExecutionBySession`).
    pub startup_liveness_grace_window_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".kandev/state"),
            default_executor_id: None,
            runtimes: RuntimeDefaultsTable::default(),
            worktree_branch_prefix: "kandev/".to_string(),
            stale_execution_retry_budget: 1,
            startup_liveness_grace_window_secs: 30,
        }
    }
}

impl ExecutorConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
