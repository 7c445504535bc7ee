// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent-settings controller: resolves abstract agent identifiers into
//! concrete runtime commands, keeps agent profiles in sync with registry
//! changes, and previews the CLI invocation a profile would produce.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod available;
mod cli_preview;
mod custom_tui;
mod models;
mod profile_sync;

pub use available::{AgentAvailability, AvailableAgent, ListAvailableAgents, ListDiscovery};
pub use cli_preview::{build_command_preview, CommandPreview};
pub use custom_tui::{register_custom_tui_agent, slugify, CustomTuiAgentRequest, CustomTuiError, CustomTuiStore};
pub use models::DynamicModelsProvider;
pub use profile_sync::{ensure_initial_agent_profiles, ProfileStore, ProfileSyncError, ProfileSyncOutcome};

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    pub use crate::custom_tui::fakes::FakeCustomTuiStore;
    pub use crate::models::fakes::FakeDynamicModelsProvider;
    pub use crate::profile_sync::fakes::FakeProfileStore;
}
