// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon wiring: tracing init, config load, and collaborator construction.
//!
//! This crate holds no protocol of its own — `kandev-transport` normalizes
//! the agent wire protocol and `kandev-executor` drives the session state
//! machine; this crate's only job is to stand both of those up against real
//! (filesystem, `$PATH`, `$SHELL`) collaborators and keep the process alive.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod builtin_agents;
mod discovery;
mod env;
mod notify;
mod profile_store;
mod secrets;
mod shell;
mod stderr;

pub use builtin_agents::{load_builtin_agents, BuiltinAgentsError};
pub use discovery::PathDiscoveryCollaborator;
pub use notify::DesktopNotifyProvider;
pub use profile_store::FileProfileStore;
pub use secrets::EnvSecretStore;
pub use shell::EnvShellPreferenceProvider;
pub use stderr::NoopStderrProvider;

use kandev_core::NotifyProvider;
use kandev_executor::ExecutorConfig;
use kandev_registry::{AgentRegistry, ModelCache};
use kandev_settings::{ensure_initial_agent_profiles, AgentAvailability};
use kandev_storage::FileSessionStore;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load executor config: {0}")]
    Config(#[from] kandev_executor::ConfigError),
    #[error("failed to load agent definitions: {0}")]
    Agents(#[from] BuiltinAgentsError),
    #[error("agent {0} rejected registration: {1}")]
    Registration(String, String),
    #[error("failed to load profile store: {0}")]
    ProfileStore(String),
    #[error("initial profile sync failed: {0}")]
    ProfileSync(#[from] kandev_settings::ProfileSyncError),
}

/// Everything the daemon process holds for its lifetime.
pub struct Daemon {
    pub config: ExecutorConfig,
    pub registry: Arc<AgentRegistry>,
    pub availability: Arc<AgentAvailability>,
    pub repository: Arc<FileSessionStore>,
    pub profiles: Arc<FileProfileStore>,
    pub notify: Arc<dyn NotifyProvider>,
}

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Initializes tracing from `KANDEV_LOG`/`RUST_LOG` (default `info`). Safe to
/// call more than once (e.g. from tests).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads config, registers the static agent definitions, and runs the
/// initial profile-sync pass so every enabled agent has a default profile
/// before the first session is prepared.
pub async fn bootstrap() -> Result<Daemon, StartupError> {
    let state_dir = env::state_dir();
    let config_path = env::config_path(&state_dir);
    let config = if config_path.exists() {
        ExecutorConfig::load(&config_path)?
    } else {
        let mut config = ExecutorConfig::default();
        config.state_dir = state_dir.clone();
        config
    };
    tokio::fs::create_dir_all(&config.state_dir).await.map_err(|e| StartupError::ProfileStore(e.to_string()))?;

    let registry = Arc::new(AgentRegistry::new());
    for agent in load_builtin_agents()? {
        let id = agent.id.to_string();
        registry.register(agent).map_err(|e| StartupError::Registration(id, e.to_string()))?;
    }

    let discovery: Arc<dyn kandev_registry::DiscoveryCollaborator> = Arc::new(PathDiscoveryCollaborator);
    let model_cache = Arc::new(ModelCache::new());
    let availability = Arc::new(AgentAvailability::new(registry.clone(), discovery, model_cache));

    let repository = Arc::new(FileSessionStore::new(config.state_dir.clone()));
    let profiles =
        Arc::new(FileProfileStore::load(&config.state_dir).await.map_err(StartupError::ProfileStore)?);

    ensure_initial_agent_profiles(&registry, &availability, profiles.as_ref(), now_ms()).await?;

    let notify: Arc<dyn NotifyProvider> = Arc::new(DesktopNotifyProvider::new());

    Ok(Daemon { config, registry, availability, repository, profiles, notify })
}
