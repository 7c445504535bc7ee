// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProfileStore` backing the agent-settings controller's profile-sync pass:
//! one zstd-compressed JSON document per table (`agents.json.zst`,
//! `profiles.json.zst`) under the daemon's state directory, rewritten whole
//! on every mutation. Volumes here are a handful of rows per host, so a
//! whole-document rewrite is simpler than per-row files and cheap enough.

use async_trait::async_trait;
use kandev_core::{Agent, AgentId, AgentProfile, AgentProfileId};
use kandev_settings::ProfileStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const ZSTD_LEVEL: i32 = 3;

pub struct FileProfileStore {
    agents_path: PathBuf,
    profiles_path: PathBuf,
    agents: Mutex<HashMap<AgentId, Agent>>,
    profiles: Mutex<HashMap<AgentProfileId, AgentProfile>>,
}

impl FileProfileStore {
    /// Loads any existing snapshots from `state_dir`, tolerating a missing
    /// file (first run) but not a corrupt one.
    pub async fn load(state_dir: &Path) -> Result<Self, String> {
        let agents_path = state_dir.join("agents.json.zst");
        let profiles_path = state_dir.join("profiles.json.zst");
        let agents = read_snapshot(&agents_path).await?.unwrap_or_default();
        let profiles = read_snapshot(&profiles_path).await?.unwrap_or_default();
        Ok(Self { agents_path, profiles_path, agents: Mutex::new(agents), profiles: Mutex::new(profiles) })
    }

    pub fn profile(&self, id: &AgentProfileId) -> Option<AgentProfile> {
        self.profiles.lock().get(id).cloned()
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn upsert_agent(&self, agent: &Agent) -> Result<(), String> {
        let snapshot = {
            let mut agents = self.agents.lock();
            agents.insert(agent.id.clone(), agent.clone());
            agents.clone()
        };
        write_snapshot(&self.agents_path, &snapshot).await
    }

    async fn list_profiles(&self, agent_id: &AgentId) -> Vec<AgentProfile> {
        self.profiles.lock().values().filter(|p| &p.agent_id == agent_id).cloned().collect()
    }

    async fn save_profile(&self, profile: &AgentProfile) -> Result<(), String> {
        let snapshot = {
            let mut profiles = self.profiles.lock();
            profiles.insert(profile.id, profile.clone());
            profiles.clone()
        };
        write_snapshot(&self.profiles_path, &snapshot).await
    }
}

async fn write_snapshot<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_vec(value).map_err(|e| e.to_string())?;
    let compressed = zstd::encode_all(json.as_slice(), ZSTD_LEVEL).map_err(|e| e.to_string())?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| e.to_string())?;
    }
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, &compressed).await.map_err(|e| e.to_string())?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| e.to_string())?;
    Ok(())
}

async fn read_snapshot<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    let compressed = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.to_string()),
    };
    let json = zstd::decode_all(compressed.as_slice()).map_err(|e| e.to_string())?;
    serde_json::from_slice(&json).map(Some).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "profile_store_tests.rs"]
mod tests;
