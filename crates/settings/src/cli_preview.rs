// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command preview: renders the command an agent profile would launch,
//! given draft permission values and a passthrough flag.

use kandev_core::{Agent, AgentProfile, ApplyMethod};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPreview {
    pub tokens: Vec<String>,
    pub shell_string: String,
}

/// Builds the preview for `agent`/`profile`, with `permission_values`
/// overriding the profile's own permission toggles (so a settings UI can
/// preview an edit before saving it).
pub fn build_command_preview(
    agent: &Agent,
    profile: &AgentProfile,
    permission_values: &BTreeMap<String, bool>,
    cli_passthrough: bool,
) -> CommandPreview {
    let tokens = if cli_passthrough {
        passthrough_tokens(agent, profile)
    } else {
        agent_tokens(agent, profile, permission_values)
    };
    let shell_string = tokens.iter().map(|t| quote_if_needed(t)).collect::<Vec<_>>().join(" ");
    CommandPreview { tokens, shell_string }
}

fn agent_tokens(agent: &Agent, profile: &AgentProfile, permission_values: &BTreeMap<String, bool>) -> Vec<String> {
    let mut tokens = agent.base_command.clone();

    if let Some(model_flag) = &agent.model_flag {
        for arg in model_flag {
            tokens.push(arg.replace("{model}", &profile.model));
        }
    }

    for (name, setting) in &agent.permissions {
        if !setting.supported || setting.apply_method != ApplyMethod::CliFlag {
            continue;
        }
        let enabled = permission_values.get(name).copied().unwrap_or(setting.default);
        if !enabled {
            continue;
        }
        if let Some(value) = &setting.cli_flag_value {
            tokens.push(setting.cli_flag.clone());
            tokens.push(value.clone());
        } else {
            tokens.extend(setting.cli_flag.split_whitespace().map(str::to_string));
        }
    }

    tokens
}

/// Renders the passthrough launch command. The real prompt text is only
/// known at launch time, so the preview leaves the `{prompt}` placeholder
/// in place rather than substituting it.
fn passthrough_tokens(agent: &Agent, _profile: &AgentProfile) -> Vec<String> {
    let Some(passthrough) = &agent.passthrough else { return agent.base_command.clone() };
    let mut tokens = passthrough.command.clone();

    match &passthrough.prompt_flag {
        Some(flag_template) => tokens.extend(flag_template.iter().cloned()),
        None => tokens.push("{prompt}".to_string()),
    }
    tokens
}

/// Double-quotes any token containing whitespace or `"'` `` ` `` `$`,
/// escaping internal `"` as `\"`.
fn quote_if_needed(token: &str) -> String {
    let needs_quoting = token.is_empty()
        || token.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '$'));
    if !needs_quoting {
        return token.to_string();
    }
    format!("\"{}\"", token.replace('"', "\\\""))
}

#[cfg(test)]
#[path = "cli_preview_tests.rs"]
mod tests;
