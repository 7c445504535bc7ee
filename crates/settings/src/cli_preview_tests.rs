// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kandev_core::test_support::{test_agent, test_profile};
use kandev_core::PermissionSetting;

fn with_permission(mut agent: Agent, name: &str, setting: PermissionSetting) -> Agent {
    agent.permissions.insert(name.to_string(), setting);
    agent
}

#[test]
fn model_flag_substitutes_placeholder() {
    let mut agent = test_agent("codex");
    agent.model_flag = Some(vec!["--model".to_string(), "{model}".to_string()]);
    let mut profile = test_profile(&agent);
    profile.model = "gpt-5".to_string();

    let preview = build_command_preview(&agent, &profile, &BTreeMap::new(), false);

    assert!(preview.tokens.ends_with(&["--model".to_string(), "gpt-5".to_string()]));
}

#[test]
fn enabled_cli_flag_permission_with_value_appends_flag_and_value() {
    let agent = test_agent("codex");
    let agent = with_permission(
        agent,
        "auto_approve",
        PermissionSetting {
            supported: true,
            default: false,
            label: "Auto approve".to_string(),
            description: "skip confirmation".to_string(),
            apply_method: ApplyMethod::CliFlag,
            cli_flag: "--mode".to_string(),
            cli_flag_value: Some("yolo".to_string()),
        },
    );
    let profile = test_profile(&agent);
    let mut values = BTreeMap::new();
    values.insert("auto_approve".to_string(), true);

    let preview = build_command_preview(&agent, &profile, &values, false);

    assert!(preview.tokens.windows(2).any(|w| w == ["--mode", "yolo"]));
}

#[test]
fn disabled_permission_is_not_appended() {
    let agent = test_agent("codex");
    let agent = with_permission(
        agent,
        "auto_approve",
        PermissionSetting {
            supported: true,
            default: true,
            label: "Auto approve".to_string(),
            description: "skip confirmation".to_string(),
            apply_method: ApplyMethod::CliFlag,
            cli_flag: "--auto-approve".to_string(),
            cli_flag_value: None,
        },
    );
    let profile = test_profile(&agent);
    let mut values = BTreeMap::new();
    values.insert("auto_approve".to_string(), false);

    let preview = build_command_preview(&agent, &profile, &values, false);

    assert!(!preview.tokens.iter().any(|t| t == "--auto-approve"));
}

#[test]
fn unsupported_permission_is_never_applied_even_when_value_is_true() {
    let agent = test_agent("codex");
    let agent = with_permission(
        agent,
        "auto_approve",
        PermissionSetting {
            supported: false,
            default: true,
            label: "Auto approve".to_string(),
            description: "skip confirmation".to_string(),
            apply_method: ApplyMethod::CliFlag,
            cli_flag: "--auto-approve".to_string(),
            cli_flag_value: None,
        },
    );
    let profile = test_profile(&agent);
    let mut values = BTreeMap::new();
    values.insert("auto_approve".to_string(), true);

    let preview = build_command_preview(&agent, &profile, &values, false);

    assert!(!preview.tokens.iter().any(|t| t == "--auto-approve"));
}

#[test]
fn passthrough_without_prompt_flag_appends_bare_placeholder() {
    let mut agent = test_agent("claude-code");
    agent.passthrough = Some(kandev_core::PassthroughConfig {
        command: vec!["claude".to_string()],
        prompt_flag: None,
    });
    let profile = test_profile(&agent);

    let preview = build_command_preview(&agent, &profile, &BTreeMap::new(), true);

    assert_eq!(preview.tokens, vec!["claude".to_string(), "{prompt}".to_string()]);
}

#[test]
fn passthrough_with_prompt_flag_keeps_template() {
    let mut agent = test_agent("claude-code");
    agent.passthrough = Some(kandev_core::PassthroughConfig {
        command: vec!["claude".to_string()],
        prompt_flag: Some(vec!["-p".to_string(), "{prompt}".to_string()]),
    });
    let profile = test_profile(&agent);

    let preview = build_command_preview(&agent, &profile, &BTreeMap::new(), true);

    assert_eq!(
        preview.tokens,
        vec!["claude".to_string(), "-p".to_string(), "{prompt}".to_string()]
    );
}

#[test]
fn shell_string_quotes_tokens_with_whitespace() {
    let mut agent = test_agent("codex");
    agent.base_command = vec!["codex".to_string(), "run all tests".to_string()];
    let profile = test_profile(&agent);

    let preview = build_command_preview(&agent, &profile, &BTreeMap::new(), false);

    assert_eq!(preview.shell_string, "codex \"run all tests\"");
}

#[test]
fn shell_string_escapes_internal_quotes() {
    let mut agent = test_agent("codex");
    agent.base_command = vec!["codex".to_string(), "say \"hi\"".to_string()];
    let profile = test_profile(&agent);

    let preview = build_command_preview(&agent, &profile, &BTreeMap::new(), false);

    assert_eq!(preview.shell_string, "codex \"say \\\"hi\\\"\"");
}
