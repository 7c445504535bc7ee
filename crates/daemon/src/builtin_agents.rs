// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads the static agent registry definitions: baked in at compile time,
//! overridable at runtime via `KANDEV_AGENTS_CONFIG`.

use kandev_core::Agent;
use serde::Deserialize;
use thiserror::Error;

const BUILTIN_AGENTS_TOML: &str = include_str!("../config/agents.toml");

#[derive(Debug, Error)]
pub enum BuiltinAgentsError {
    #[error("failed to read {path}: {source}")]
    Read { path: std::path::PathBuf, source: std::io::Error },
    #[error("failed to parse agent definitions: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct AgentsFile {
    agent: Vec<Agent>,
}

/// Loads agent definitions from `KANDEV_AGENTS_CONFIG` if set, else the
/// definitions baked into the binary at compile time.
pub fn load_builtin_agents() -> Result<Vec<Agent>, BuiltinAgentsError> {
    match std::env::var("KANDEV_AGENTS_CONFIG") {
        Ok(path) => {
            let path = std::path::PathBuf::from(path);
            let contents =
                std::fs::read_to_string(&path).map_err(|source| BuiltinAgentsError::Read { path, source })?;
            Ok(toml::from_str::<AgentsFile>(&contents)?.agent)
        }
        Err(_) => Ok(toml::from_str::<AgentsFile>(BUILTIN_AGENTS_TOML)?.agent),
    }
}
