// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn base_agent() -> Agent {
    Agent {
        id: AgentId::new("codex"),
        name: "codex".to_string(),
        display_name: None,
        enabled: true,
        display_order: 0,
        base_command: vec!["codex".to_string()],
        model_flag: Some(vec!["--model".to_string(), "{model}".to_string()]),
        default_model: Some("gpt-5-codex".to_string()),
        capabilities: AgentCapabilities {
            supports_session_resume: true,
            supports_shell: true,
            workspace_only: false,
            supports_dynamic_models: true,
        },
        permissions: BTreeMap::new(),
        passthrough: None,
        logo: Logo::default(),
        supports_mcp: true,
        mcp_config_path: None,
    }
}

#[test]
fn resolved_display_name_falls_back_to_name() {
    let agent = base_agent();
    assert_eq!(agent.resolved_display_name(), "codex");
}

#[test]
fn resolved_display_name_prefers_display_name() {
    let mut agent = base_agent();
    agent.display_name = Some("Codex".to_string());
    assert_eq!(agent.resolved_display_name(), "Codex");
}

#[test]
fn passthrough_only_requires_missing_default_model() {
    let mut agent = base_agent();
    agent.passthrough =
        Some(PassthroughConfig { command: vec!["claude".to_string()], prompt_flag: None });
    assert!(!agent.is_passthrough_only(), "has a default model, so not passthrough-only");

    agent.default_model = None;
    assert!(agent.is_passthrough_only());
}

#[test]
fn agent_id_compares_against_str() {
    let id = AgentId::new("codex");
    assert_eq!(id, "codex");
}
