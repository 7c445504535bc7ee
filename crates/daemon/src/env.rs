// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

/// Resolve state directory: `KANDEV_STATE_DIR` > `XDG_STATE_HOME/kandev` >
/// `~/.local/state/kandev`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("KANDEV_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = dirs::state_dir() {
        return xdg.join("kandev");
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".local/state/kandev")
}

/// Path to the executor config TOML, overridable via `KANDEV_CONFIG`.
pub fn config_path(state_dir: &std::path::Path) -> PathBuf {
    std::env::var("KANDEV_CONFIG").map(PathBuf::from).unwrap_or_else(|_| state_dir.join("config.toml"))
}

/// `RUST_LOG`-compatible filter override, defaulting to `info`.
pub fn log_filter() -> String {
    std::env::var("KANDEV_LOG").or_else(|_| std::env::var("RUST_LOG")).unwrap_or_else(|_| "info".to_string())
}
