// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_match_spec_constants() {
    let config = ExecutorConfig::default();
    assert_eq!(config.stale_execution_retry_budget, 1);
    assert_eq!(config.startup_liveness_grace_window_secs, 30);
}

#[test]
fn parses_partial_toml_over_defaults() {
    let config = ExecutorConfig::from_toml_str(
        r#"
        state_dir = "/var/lib/kandev"
        default_executor_id = "local-default"

        [runtimes.worktree]
        setup_script = "npm install"
        "#,
    )
    .unwrap();

    assert_eq!(config.state_dir.to_str().unwrap(), "/var/lib/kandev");
    assert_eq!(config.default_executor_id.as_deref(), Some("local-default"));
    assert_eq!(config.runtimes.worktree.setup_script.as_deref(), Some("npm install"));
    assert_eq!(config.runtimes.local.setup_script, None);
    assert_eq!(config.stale_execution_retry_budget, 1);
}

#[test]
fn rejects_malformed_toml() {
    let err = ExecutorConfig::from_toml_str("not = [valid").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reports_missing_file() {
    let err = ExecutorConfig::load(std::path::Path::new("/nonexistent/kandev-executor.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
